use crate::consts::*;

/// The registers of the IPIC bank the driver touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpicReg {
    Cisv,
    Ipr,
    Isvr,
    Eoi,
    Soi,
    Idx,
    Icsr,
}

// Only the CSR backend and the simulator ask for register numbers.
#[cfg_attr(
    not(any(test, feature = "sim", target_arch = "riscv32", target_arch = "riscv64")),
    allow(dead_code)
)]
impl IpicReg {
    /// Offset from [`IPIC_MBASE`].
    pub const fn offset(self) -> usize {
        match self {
            Self::Cisv => IPIC_CISV_OFFSET,
            Self::Ipr => IPIC_IPR_OFFSET,
            Self::Isvr => IPIC_ISVR_OFFSET,
            Self::Eoi => IPIC_EOI_OFFSET,
            Self::Soi => IPIC_SOI_OFFSET,
            Self::Idx => IPIC_IDX_OFFSET,
            Self::Icsr => IPIC_ICSR_OFFSET,
        }
    }

    /// CSR number of the register.
    pub const fn csr(self) -> usize {
        IPIC_MBASE + self.offset()
    }
}

/// Register backend of an [`crate::Ipic`].
///
/// Implemented only by the backends in this crate and not nameable outside
/// it, so nothing but the driver can write IDX or ICSR. Each call is exactly
/// one hardware access; the IDX/ICSR pair is protected by the indexed window.
pub trait IpicRegs {
    fn read(&self, reg: IpicReg) -> usize;
    fn write(&self, reg: IpicReg, val: usize);
}

impl<R: IpicRegs + ?Sized> IpicRegs for &R {
    fn read(&self, reg: IpicReg) -> usize {
        (**self).read(reg)
    }

    fn write(&self, reg: IpicReg, val: usize) {
        (**self).write(reg, val)
    }
}

/// The IPIC CSR bank of the executing hart. Obtained through
/// [`crate::Ipic::new_csr`].
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Debug)]
pub struct CsrIpic {
    _private: (),
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl CsrIpic {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl IpicRegs for CsrIpic {
    fn read(&self, reg: IpicReg) -> usize {
        crate::utils::perform_csr_read(reg.offset())
    }

    fn write(&self, reg: IpicReg, val: usize) {
        crate::utils::perform_csr_write(reg.offset(), val)
    }
}
