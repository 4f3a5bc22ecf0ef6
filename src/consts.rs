// Follows the Syntacore IPIC register map (machine-mode CSR bank).

/// Upper bound on interrupt lines the IPIC can arbitrate.
/// Line IDs range from 0 to `IPIC_MAX_LINES - 1`.
pub const IPIC_MAX_LINES: usize = 32;

/// First CSR of the IPIC bank. Every register below is `IPIC_MBASE + offset`.
pub const IPIC_MBASE: usize = 0xbf0;

// --- Register Offsets (relative to IPIC_MBASE) ---

/// Current in-service vector. Reads the void vector when nothing is in service.
pub const IPIC_CISV_OFFSET: usize = 0;

/// Control/status of the current in-service vector.
pub const IPIC_CICSR_OFFSET: usize = 1;

/// Pending summary, one bit per line.
pub const IPIC_IPR_OFFSET: usize = 2;

/// In-service summary, one bit per line.
pub const IPIC_ISVR_OFFSET: usize = 3;

/// End-of-interrupt: any write retires the innermost in-service line.
pub const IPIC_EOI_OFFSET: usize = 4;

/// Start-of-interrupt: any write resolves the highest-priority ready line.
pub const IPIC_SOI_OFFSET: usize = 5;

/// Index register selecting the line addressed by ICSR.
pub const IPIC_IDX_OFFSET: usize = 6;

/// Configuration word of the line selected by IDX.
pub const IPIC_ICSR_OFFSET: usize = 7;

/// Enable summary.
pub const IPIC_IER_OFFSET: usize = 8;

/// Line-to-vector map summary.
pub const IPIC_IMAP_OFFSET: usize = 9;

// --- ICSR bits ---

/// Request latched. Writing 1 clears it.
pub const IPIC_IRQ_PENDING: usize = 1 << 0;
pub const IPIC_IRQ_CLEAR_PENDING: usize = IPIC_IRQ_PENDING;
pub const IPIC_IRQ_ENABLE: usize = 1 << 1;
pub const IPIC_IRQ_LEVEL: usize = 0 << 2;
pub const IPIC_IRQ_EDGE: usize = 1 << 2;
pub const IPIC_IRQ_INV: usize = 1 << 3;
pub const IPIC_IRQ_MODE_MASK: usize = 3 << 2;
/// Read-only.
pub const IPIC_IRQ_IN_SERVICE: usize = 1 << 4;
pub const IPIC_IRQ_PRIV_MASK: usize = 3 << 8;
pub const IPIC_IRQ_PRIV_MMODE: usize = 3 << 8;
pub const IPIC_IRQ_PRIV_SMODE: usize = 1 << 8;

/// Shift of the vector field inside ICSR.
pub const IPIC_IRQ_VEC_OFFS: usize = 12;
