use bitmaps::Bitmap;
use log::warn;
use spin::Mutex;

use crate::consts::*;
use crate::regs::{IpicReg, IpicRegs};

const SIM_STACK_DEPTH: usize = 2 * IPIC_MAX_LINES;

struct SimState {
    idx: usize,
    /// Stored ICSR fields, without the pending and in-service bits.
    words: [usize; IPIC_MAX_LINES],
    pending: Bitmap<IPIC_MAX_LINES>,
    in_service: Bitmap<IPIC_MAX_LINES>,
    /// `None` entries are void resolutions.
    stack: [Option<usize>; SIM_STACK_DEPTH],
    depth: usize,
    raise_on_select: Option<usize>,
}

/// Software model of the IPIC register bank.
///
/// Pending is write-1-to-clear, in-service is read-only, line 0 has the
/// highest priority and only a strictly higher-priority line preempts. An SOI
/// that finds nothing ready pushes a void marker so its EOI stays balanced.
pub struct SimIpic {
    lines: usize,
    state: Mutex<SimState>,
    /// Runs after every IDX write, outside the state lock.
    trap_hook: Mutex<Option<fn()>>,
}

impl SimIpic {
    pub fn new(lines: usize) -> Self {
        assert!(
            lines > 0 && lines <= IPIC_MAX_LINES,
            "Invalid simulated line count {}",
            lines
        );
        Self {
            lines,
            state: Mutex::new(SimState {
                idx: 0,
                words: [0; IPIC_MAX_LINES],
                pending: Bitmap::new(),
                in_service: Bitmap::new(),
                stack: [None; SIM_STACK_DEPTH],
                depth: 0,
                raise_on_select: None,
            }),
            trap_hook: Mutex::new(None),
        }
    }

    /// Installs the core's trap entry. The sim calls it right after IDX is
    /// written, where an unmasked core would take a pending interrupt.
    pub fn set_trap_hook(&self, hook: fn()) {
        *self.trap_hook.lock() = Some(hook);
    }

    fn void_vector(&self) -> usize {
        self.lines
    }

    /// Latches a request on `line`, as a device asserting it would.
    pub fn raise(&self, line: usize) {
        assert!(line < self.lines, "Invalid simulated line {}", line);
        self.state.lock().pending.set(line, true);
    }

    /// Raises `line` the next time IDX is written, i.e. between the select
    /// and the access of a window operation.
    pub fn raise_on_select(&self, line: usize) {
        assert!(line < self.lines, "Invalid simulated line {}", line);
        self.state.lock().raise_on_select = Some(line);
    }

    /// Level of the IPIC's external interrupt output.
    pub fn external_pending(&self) -> bool {
        self.ready_line(&self.state.lock()).is_some()
    }

    /// Entries on the in-service stack, void markers included.
    pub fn in_service_depth(&self) -> usize {
        self.state.lock().depth
    }

    fn ready_line(&self, state: &SimState) -> Option<usize> {
        let threshold = state.in_service.first_index().unwrap_or(self.lines);
        (0..threshold.min(self.lines)).find(|&line| {
            let word = state.words[line];
            word & IPIC_IRQ_ENABLE != 0
                && state.pending.get(line)
                && word >> IPIC_IRQ_VEC_OFFS != self.void_vector()
        })
    }

    fn start_of_service(&self, state: &mut SimState) {
        let resolved = self.ready_line(state);
        if let Some(line) = resolved {
            state.pending.set(line, false);
            state.in_service.set(line, true);
        }
        assert!(state.depth < SIM_STACK_DEPTH, "IPIC in-service stack overflow");
        state.stack[state.depth] = resolved;
        state.depth += 1;
    }

    fn end_of_service(&self, state: &mut SimState) {
        if state.depth == 0 {
            warn!("sim IPIC: EOI with nothing in service");
            return;
        }
        state.depth -= 1;
        if let Some(line) = state.stack[state.depth].take() {
            state.in_service.set(line, false);
        }
    }
}

impl IpicRegs for SimIpic {
    fn read(&self, reg: IpicReg) -> usize {
        let state = self.state.lock();
        match reg {
            IpicReg::Cisv => match state.depth.checked_sub(1).and_then(|top| state.stack[top]) {
                Some(line) => state.words[line] >> IPIC_IRQ_VEC_OFFS,
                None => self.void_vector(),
            },
            IpicReg::Ipr => state.pending.into_value() as usize,
            IpicReg::Isvr => state.in_service.into_value() as usize,
            IpicReg::Idx => state.idx,
            IpicReg::Icsr => {
                let line = state.idx;
                if line >= self.lines {
                    warn!("sim IPIC: ICSR read with IDX {} out of range", line);
                    return 0;
                }
                let mut word = state.words[line];
                if state.pending.get(line) {
                    word |= IPIC_IRQ_PENDING;
                }
                if state.in_service.get(line) {
                    word |= IPIC_IRQ_IN_SERVICE;
                }
                word
            }
            _ => {
                warn!("sim IPIC: read of unmodelled CSR {:#x}", reg.csr());
                0
            }
        }
    }

    fn write(&self, reg: IpicReg, val: usize) {
        if reg == IpicReg::Idx {
            {
                let mut state = self.state.lock();
                state.idx = val;
                if let Some(line) = state.raise_on_select.take() {
                    state.pending.set(line, true);
                }
            }
            let hook = *self.trap_hook.lock();
            if let Some(hook) = hook {
                hook();
            }
            return;
        }
        let mut state = self.state.lock();
        match reg {
            IpicReg::Icsr => {
                let line = state.idx;
                if line >= self.lines {
                    warn!("sim IPIC: ICSR write with IDX {} out of range", line);
                    return;
                }
                if val & IPIC_IRQ_CLEAR_PENDING != 0 {
                    state.pending.set(line, false);
                }
                state.words[line] = val & !(IPIC_IRQ_PENDING | IPIC_IRQ_IN_SERVICE);
            }
            IpicReg::Soi => self.start_of_service(&mut state),
            IpicReg::Eoi => self.end_of_service(&mut state),
            _ => warn!("sim IPIC: write of unmodelled CSR {:#x}", reg.csr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(sim: &SimIpic, line: usize, vector: usize, enabled: bool) {
        sim.write(IpicReg::Idx, line);
        let enable = if enabled { IPIC_IRQ_ENABLE } else { 0 };
        sim.write(IpicReg::Icsr, (vector << IPIC_IRQ_VEC_OFFS) | enable);
    }

    #[test]
    fn lowest_line_wins_and_eoi_pops_innermost() {
        let sim = SimIpic::new(8);
        program(&sim, 5, 5, true);
        program(&sim, 2, 2, true);
        sim.raise(5);
        sim.raise(2);

        sim.write(IpicReg::Soi, 0);
        assert_eq!(sim.read(IpicReg::Cisv), 2);
        // Line 5 cannot preempt line 2.
        assert!(!sim.external_pending());
        sim.write(IpicReg::Eoi, 0);
        assert!(sim.external_pending());

        sim.write(IpicReg::Soi, 0);
        assert_eq!(sim.read(IpicReg::Cisv), 5);
        sim.write(IpicReg::Eoi, 0);
        assert_eq!(sim.read(IpicReg::Cisv), 8);
        assert_eq!(sim.in_service_depth(), 0);
    }

    #[test]
    fn void_resolution_is_balanced_by_eoi() {
        let sim = SimIpic::new(4);
        program(&sim, 1, 1, true);
        sim.raise(1);
        sim.write(IpicReg::Soi, 0);
        sim.write(IpicReg::Soi, 0);
        assert_eq!(sim.read(IpicReg::Cisv), 4);
        sim.write(IpicReg::Eoi, 0);
        assert_eq!(sim.read(IpicReg::Cisv), 1);
        sim.write(IpicReg::Eoi, 0);
        assert_eq!(sim.read(IpicReg::Isvr), 0);
    }

    #[test]
    fn disabled_or_void_lines_never_resolve() {
        let sim = SimIpic::new(4);
        program(&sim, 0, 0, false);
        program(&sim, 1, 4, true);
        sim.raise(0);
        sim.raise(1);
        assert!(!sim.external_pending());
        assert_eq!(sim.read(IpicReg::Ipr), 0b11);
    }
}
