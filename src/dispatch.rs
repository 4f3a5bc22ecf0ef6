use log::trace;

use crate::irq::CoreIrq;
use crate::regs::{IpicReg, IpicRegs};
use crate::table::VectorTable;
use crate::Ipic;

/// One SOI/EOI bracket. Dropping it issues EOI, so every resolution is
/// retired exactly once on every exit path.
struct InService<'a, R: IpicRegs> {
    regs: &'a R,
    vector: usize,
}

impl<'a, R: IpicRegs> InService<'a, R> {
    fn start(regs: &'a R) -> Self {
        regs.write(IpicReg::Soi, 0);
        Self {
            regs,
            vector: regs.read(IpicReg::Cisv),
        }
    }
}

impl<R: IpicRegs> Drop for InService<'_, R> {
    fn drop(&mut self) {
        self.regs.write(IpicReg::Eoi, 0);
    }
}

impl<R: IpicRegs, M: CoreIrq, T: VectorTable> Ipic<R, M, T> {
    /// Services one external interrupt trap.
    ///
    /// Runs the handler registered at `vector + isr_offset`, if any. A void
    /// resolution or an empty table slot ends the cycle without error.
    ///
    /// Relies on the hardware's in-service stack: EOI always retires the
    /// innermost line. No current vector is kept here, so a handler may be
    /// preempted by a higher-priority line and the nested call retires its
    /// own line first. A line still ready after EOI re-raises the trap.
    pub fn handle_external_irq(&self) {
        let service = InService::start(self.window.regs());
        if service.vector == self.config.void_vector() {
            trace!("IPIC: spurious external interrupt");
            return;
        }
        trace!("IPIC vector {}", service.vector);
        match self.table.lookup(service.vector + self.config.isr_offset) {
            Some(entry) => entry.invoke(),
            None => trace!("IPIC: no handler for vector {}", service.vector),
        }
    }
}
