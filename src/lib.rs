#![cfg_attr(not(test), no_std)]

mod config;
mod consts;
mod dispatch;
mod irq;
mod line;
mod regs;
#[cfg(any(test, feature = "sim"))]
mod sim;
mod table;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod utils;
mod window;


pub use config::IpicConfig;
pub use consts::*;
pub use irq::{CoreIrq, IrqGuard};
pub use line::{LineState, Privilege, TriggerMode};
#[cfg(any(test, feature = "sim"))]
pub use sim::SimIpic;
pub use table::{IsrEntry, IsrTable, VectorTable};

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use irq::MachineIrq;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use regs::CsrIpic;

use axerrno::AxResult;
use bitmaps::Bitmap;
use line::config_word;
use log::{debug, info};
use regs::{IpicReg, IpicRegs};
use window::IndexedWindow;

/// One IPIC instance together with the vector table it dispatches into.
///
/// - `R` reaches the registers,
/// - `M` masks interrupts on the executing core,
/// - `T` maps resolved vectors to handlers.
///
/// Arbitration among ready lines is left to the hardware. Register access
/// only goes through the methods below; the backend trait is not public:
///
/// ```compile_fail
/// use scr_ipic::IpicRegs;
/// ```
pub struct Ipic<R, M, T> {
    config: IpicConfig,
    window: IndexedWindow<R, M>,
    table: T,
}

impl<R: IpicRegs, M: CoreIrq, T: VectorTable> Ipic<R, M, T> {
    pub const fn new(regs: R, table: T, config: IpicConfig) -> Self {
        Self {
            config,
            window: IndexedWindow::new(regs),
            table,
        }
    }

    pub fn config(&self) -> &IpicConfig {
        &self.config
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Boot-time setup. Call once, before interrupts are unmasked and after
    /// the vector table accepts lookups.
    ///
    /// Puts every line in the void state and unmasks the core's external
    /// interrupt. The platform's machine-external trap handler must call
    /// [`Ipic::handle_external_irq`].
    pub fn init(&self) {
        for line in 0..self.config.lines {
            self.reset_line(line);
        }
        M::enable_external();
        info!(
            "IPIC: {} lines, {} mapping, isr offset {}",
            self.config.lines,
            if self.config.static_mapping { "static" } else { "dynamic" },
            self.config.isr_offset
        );
    }

    fn check_line(&self, line: usize) {
        assert!(
            line < self.config.lines,
            "Invalid IPIC line {} (lines: {})",
            line,
            self.config.lines
        );
    }

    /// Sets the enable bit, leaving every other field untouched.
    pub fn enable_line(&self, line: usize) {
        self.check_line(line);
        // Pending is write-1-to-clear; writing it back as 0 keeps the request.
        self.window
            .modify(line, |word| (word & !IPIC_IRQ_PENDING) | IPIC_IRQ_ENABLE);
    }

    /// Clears the enable bit and drops any latched request.
    pub fn disable_line(&self, line: usize) {
        self.check_line(line);
        self.window
            .modify(line, |word| (word & !IPIC_IRQ_ENABLE) | IPIC_IRQ_CLEAR_PENDING);
    }

    /// Programs a line in one ICSR write. The line is left disabled with its
    /// pending request cleared.
    ///
    /// Returns the vector actually programmed: with static mapping that is
    /// always `line`, whatever `vector` asked for.
    pub fn configure_line(
        &self,
        line: usize,
        vector: usize,
        mode: TriggerMode,
        privilege: Privilege,
    ) -> usize {
        self.check_line(line);
        let vector = if self.config.static_mapping {
            line
        } else {
            assert!(
                vector < self.config.lines,
                "Invalid IPIC vector {} (lines: {})",
                vector,
                self.config.lines
            );
            vector
        };
        debug!("IPIC: line {line} -> vector {vector}, {mode:?}, {privilege:?}");
        self.window
            .write(line, config_word(vector, mode, privilege, true));
        vector
    }

    /// Returns a line to the void state: disabled, not pending, mapped to the
    /// void vector, machine-mode only.
    pub fn reset_line(&self, line: usize) {
        self.check_line(line);
        self.window.write(
            line,
            config_word(
                self.config.void_vector(),
                TriggerMode::LevelHigh,
                Privilege::Machine,
                true,
            ),
        );
    }

    /// Reads a line's configuration through the window.
    pub fn line_state(&self, line: usize) -> LineState {
        self.check_line(line);
        LineState::decode(self.window.read(line))
    }

    /// Whether the line's enable bit is set, regardless of whether it is in
    /// service.
    pub fn is_enabled(&self, line: usize) -> bool {
        self.line_state(line).enabled
    }

    /// Vector of the innermost in-service line, `None` when idle.
    pub fn current_vector(&self) -> Option<usize> {
        let vector = self.window.regs().read(IpicReg::Cisv);
        (vector != self.config.void_vector()).then_some(vector)
    }

    /// Compares `vector` against the current in-service vector register.
    ///
    /// This says nothing about the enable bit: a line that is enabled but not
    /// being serviced reports `false`. Use [`Ipic::is_enabled`] for that.
    pub fn is_current_vector(&self, vector: usize) -> bool {
        self.current_vector() == Some(vector)
    }

    /// Snapshot of the IPR register, one bit per line.
    pub fn pending_lines(&self) -> Bitmap<IPIC_MAX_LINES> {
        Bitmap::from_value(self.window.regs().read(IpicReg::Ipr) as u32)
    }

    /// Snapshot of the ISVR register, one bit per line.
    pub fn in_service_lines(&self) -> Bitmap<IPIC_MAX_LINES> {
        Bitmap::from_value(self.window.regs().read(IpicReg::Isvr) as u32)
    }

    /// Registers `handler` for `vector` in the vector table, at
    /// `vector + isr_offset`.
    pub fn connect(&self, vector: usize, handler: fn(usize), arg: usize) -> AxResult {
        let _guard = IrqGuard::<M>::new();
        self.table
            .attach(vector + self.config.isr_offset, handler, arg)
    }

    pub fn disconnect(&self, vector: usize) -> Option<IsrEntry> {
        let _guard = IrqGuard::<M>::new();
        self.table.detach(vector + self.config.isr_offset)
    }
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl<T: VectorTable> Ipic<CsrIpic, MachineIrq, T> {
    /// The IPIC of the executing hart, in machine mode.
    pub const fn new_csr(table: T, config: IpicConfig) -> Self {
        Self::new(CsrIpic::new(), table, config)
    }
}
