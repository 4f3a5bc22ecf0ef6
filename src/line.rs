use crate::consts::*;

/// Trigger condition of a line: level or edge, normal or inverted polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    LevelHigh,
    LevelLow,
    EdgeRising,
    EdgeFalling,
}

impl TriggerMode {
    pub const fn bits(self) -> usize {
        match self {
            Self::LevelHigh => IPIC_IRQ_LEVEL,
            Self::LevelLow => IPIC_IRQ_LEVEL | IPIC_IRQ_INV,
            Self::EdgeRising => IPIC_IRQ_EDGE,
            Self::EdgeFalling => IPIC_IRQ_EDGE | IPIC_IRQ_INV,
        }
    }

    pub const fn from_bits(word: usize) -> Self {
        match (word & IPIC_IRQ_EDGE != 0, word & IPIC_IRQ_INV != 0) {
            (false, false) => Self::LevelHigh,
            (false, true) => Self::LevelLow,
            (true, false) => Self::EdgeRising,
            (true, true) => Self::EdgeFalling,
        }
    }
}

/// Privilege levels allowed to take a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Machine mode only. The most restrictive setting, used on reset.
    Machine,
    /// Supervisor mode may take the interrupt.
    Supervisor,
}

impl Privilege {
    pub const fn bits(self) -> usize {
        match self {
            Self::Machine => IPIC_IRQ_PRIV_MMODE,
            Self::Supervisor => IPIC_IRQ_PRIV_SMODE,
        }
    }

    /// Any pattern other than the supervisor one is read back as `Machine`.
    pub const fn from_bits(word: usize) -> Self {
        if word & IPIC_IRQ_PRIV_MASK == IPIC_IRQ_PRIV_SMODE {
            Self::Supervisor
        } else {
            Self::Machine
        }
    }
}

/// Decoded ICSR word of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    pub vector: usize,
    pub trigger_mode: TriggerMode,
    pub privilege: Privilege,
    pub enabled: bool,
    pub pending: bool,
    /// Hardware-owned; ignored by [`LineState::encode`].
    pub in_service: bool,
}

impl LineState {
    pub const fn decode(word: usize) -> Self {
        Self {
            vector: word >> IPIC_IRQ_VEC_OFFS,
            trigger_mode: TriggerMode::from_bits(word),
            privilege: Privilege::from_bits(word),
            enabled: word & IPIC_IRQ_ENABLE != 0,
            pending: word & IPIC_IRQ_PENDING != 0,
            in_service: word & IPIC_IRQ_IN_SERVICE != 0,
        }
    }

    /// Builds the word to write back. A set `pending` flag is dropped: on
    /// write the pending bit means "clear", see [`config_word`].
    pub const fn encode(&self) -> usize {
        config_word(self.vector, self.trigger_mode, self.privilege, false)
            | if self.enabled { IPIC_IRQ_ENABLE } else { 0 }
    }
}

/// Word written by setup and reset. Leaves the line disabled.
pub const fn config_word(
    vector: usize,
    mode: TriggerMode,
    privilege: Privilege,
    clear_pending: bool,
) -> usize {
    (vector << IPIC_IRQ_VEC_OFFS)
        | mode.bits()
        | privilege.bits()
        | if clear_pending { IPIC_IRQ_CLEAR_PENDING } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_modes_cover_all_four_bit_patterns() {
        for mode in [
            TriggerMode::LevelHigh,
            TriggerMode::LevelLow,
            TriggerMode::EdgeRising,
            TriggerMode::EdgeFalling,
        ] {
            assert_eq!(TriggerMode::from_bits(mode.bits()), mode);
        }
        assert_eq!(TriggerMode::EdgeFalling.bits() & !IPIC_IRQ_MODE_MASK, 0);
    }

    #[test]
    fn unknown_privilege_pattern_reads_as_machine() {
        assert_eq!(Privilege::from_bits(2 << 8), Privilege::Machine);
        assert_eq!(Privilege::from_bits(0), Privilege::Machine);
        assert_eq!(Privilege::from_bits(IPIC_IRQ_PRIV_SMODE), Privilege::Supervisor);
    }

    #[test]
    fn encode_never_sets_pending_or_in_service() {
        let state = LineState {
            vector: 5,
            trigger_mode: TriggerMode::EdgeRising,
            privilege: Privilege::Supervisor,
            enabled: true,
            pending: true,
            in_service: true,
        };
        let word = state.encode();
        assert_eq!(word & (IPIC_IRQ_PENDING | IPIC_IRQ_IN_SERVICE), 0);
        let back = LineState::decode(word);
        assert_eq!(back.vector, 5);
        assert!(back.enabled);
        assert_eq!(back.trigger_mode, TriggerMode::EdgeRising);
    }
}
