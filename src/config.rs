use axerrno::{ax_err, AxResult};

use crate::consts::IPIC_MAX_LINES;

/// Board-level description of the IPIC instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpicConfig {
    /// Number of implemented lines.
    pub lines: usize,
    /// Lines are hardwired to the vector of the same number.
    pub static_mapping: bool,
    /// Vector table slots reserved ahead of the IPIC range.
    pub isr_offset: usize,
}

impl IpicConfig {
    pub const fn new_unchecked(lines: usize, static_mapping: bool, isr_offset: usize) -> Self {
        Self {
            lines,
            static_mapping,
            isr_offset,
        }
    }

    pub fn new(lines: usize, static_mapping: bool, isr_offset: usize) -> AxResult<Self> {
        if lines == 0 || lines > IPIC_MAX_LINES {
            return ax_err!(InvalidInput, "IPIC line count out of range");
        }
        Ok(Self::new_unchecked(lines, static_mapping, isr_offset))
    }

    /// Vector reported when no line is in service. One past the last real
    /// vector, so it never collides with one.
    pub const fn void_vector(&self) -> usize {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use axerrno::AxError;

    use super::*;

    #[test]
    fn line_count_is_bounded() {
        assert_eq!(IpicConfig::new(0, false, 0), Err(AxError::InvalidInput));
        assert_eq!(
            IpicConfig::new(IPIC_MAX_LINES + 1, false, 0),
            Err(AxError::InvalidInput)
        );
        let cfg = IpicConfig::new(16, true, 12).unwrap();
        assert_eq!(cfg.void_vector(), 16);
    }
}
