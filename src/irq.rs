use core::marker::PhantomData;

/// The executing core's interrupt mask primitives.
pub trait CoreIrq {
    /// Disables interrupt delivery on this core and returns the previous state.
    fn local_save_and_disable() -> usize;

    /// Restores a state returned by [`CoreIrq::local_save_and_disable`].
    fn local_restore(flags: usize);

    /// Unmasks the core's external interrupt line (the IPIC output).
    fn enable_external();
}

/// Keeps interrupts disabled on this core until dropped.
///
/// The saved state is restored on every exit path, including unwinding out
/// of the protected body.
pub struct IrqGuard<M: CoreIrq> {
    flags: usize,
    // Not Send: the saved state belongs to the core that took it.
    _core: PhantomData<*const M>,
}

impl<M: CoreIrq> IrqGuard<M> {
    pub fn new() -> Self {
        Self {
            flags: M::local_save_and_disable(),
            _core: PhantomData,
        }
    }
}

impl<M: CoreIrq> Default for IrqGuard<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: CoreIrq> Drop for IrqGuard<M> {
    fn drop(&mut self) {
        M::local_restore(self.flags);
    }
}

/// Machine-mode interrupt control of a RISC-V hart.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub struct MachineIrq;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl CoreIrq for MachineIrq {
    fn local_save_and_disable() -> usize {
        use riscv::register::mstatus;
        let enabled = mstatus::read().mie();
        unsafe { mstatus::clear_mie() };
        enabled as usize
    }

    fn local_restore(flags: usize) {
        if flags != 0 {
            unsafe { riscv::register::mstatus::set_mie() };
        }
    }

    fn enable_external() {
        unsafe { riscv::register::mie::set_mext() };
    }
}
