use core::marker::PhantomData;

use crate::irq::{CoreIrq, IrqGuard};
use crate::regs::{IpicReg, IpicRegs};

/// The IDX/ICSR window. Each operation selects and accesses under one
/// [`IrqGuard`], since a handler may select another line in between. Multiple
/// harts additionally need a cross-hart lock around the driver.
pub(crate) struct IndexedWindow<R, M> {
    regs: R,
    _core: PhantomData<fn() -> M>,
}

impl<R: IpicRegs, M: CoreIrq> IndexedWindow<R, M> {
    pub(crate) const fn new(regs: R) -> Self {
        Self {
            regs,
            _core: PhantomData,
        }
    }

    pub(crate) fn regs(&self) -> &R {
        &self.regs
    }

    pub(crate) fn read(&self, line: usize) -> usize {
        let _guard = IrqGuard::<M>::new();
        self.regs.write(IpicReg::Idx, line);
        self.regs.read(IpicReg::Icsr)
    }

    pub(crate) fn write(&self, line: usize, word: usize) {
        let _guard = IrqGuard::<M>::new();
        self.regs.write(IpicReg::Idx, line);
        self.regs.write(IpicReg::Icsr, word);
    }

    /// Read-modify-write of one line's word; `f` maps the old word to the new.
    pub(crate) fn modify(&self, line: usize, f: impl FnOnce(usize) -> usize) {
        let _guard = IrqGuard::<M>::new();
        self.regs.write(IpicReg::Idx, line);
        let word = self.regs.read(IpicReg::Icsr);
        self.regs.write(IpicReg::Icsr, f(word));
    }
}
