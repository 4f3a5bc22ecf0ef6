use core::arch::asm;

use crate::consts::*;

// `csrr`/`csrw` take the CSR number as an immediate, so each register of the
// bank gets its own accessor pair. The numbers must stay in sync with
// `IPIC_MBASE`.
macro_rules! ipic_csr {
    ($read:ident, $write:ident, $csr:literal) => {
        #[inline(always)]
        fn $read() -> usize {
            let val: usize;
            unsafe {
                asm!(concat!("csrr {0}, ", stringify!($csr)), out(reg) val, options(nomem, nostack));
            }
            val
        }

        #[inline(always)]
        fn $write(val: usize) {
            unsafe {
                asm!(concat!("csrw ", stringify!($csr), ", {0}"), in(reg) val, options(nostack));
            }
        }
    };
}

const _: () = assert!(IPIC_MBASE == 0xbf0);

ipic_csr!(read_cisv, write_cisv, 0xbf0);
ipic_csr!(read_cicsr, write_cicsr, 0xbf1);
ipic_csr!(read_ipr, write_ipr, 0xbf2);
ipic_csr!(read_isvr, write_isvr, 0xbf3);
ipic_csr!(read_eoi, write_eoi, 0xbf4);
ipic_csr!(read_soi, write_soi, 0xbf5);
ipic_csr!(read_idx, write_idx, 0xbf6);
ipic_csr!(read_icsr, write_icsr, 0xbf7);
ipic_csr!(read_ier, write_ier, 0xbf8);
ipic_csr!(read_imap, write_imap, 0xbf9);

pub(crate) fn perform_csr_read(offset: usize) -> usize {
    match offset {
        IPIC_CISV_OFFSET => read_cisv(),
        IPIC_CICSR_OFFSET => read_cicsr(),
        IPIC_IPR_OFFSET => read_ipr(),
        IPIC_ISVR_OFFSET => read_isvr(),
        IPIC_EOI_OFFSET => read_eoi(),
        IPIC_SOI_OFFSET => read_soi(),
        IPIC_IDX_OFFSET => read_idx(),
        IPIC_ICSR_OFFSET => read_icsr(),
        IPIC_IER_OFFSET => read_ier(),
        IPIC_IMAP_OFFSET => read_imap(),
        _ => unreachable!("IPIC has no CSR at offset {offset}"),
    }
}

pub(crate) fn perform_csr_write(offset: usize, val: usize) {
    match offset {
        IPIC_CISV_OFFSET => write_cisv(val),
        IPIC_CICSR_OFFSET => write_cicsr(val),
        IPIC_IPR_OFFSET => write_ipr(val),
        IPIC_ISVR_OFFSET => write_isvr(val),
        IPIC_EOI_OFFSET => write_eoi(val),
        IPIC_SOI_OFFSET => write_soi(val),
        IPIC_IDX_OFFSET => write_idx(val),
        IPIC_ICSR_OFFSET => write_icsr(val),
        IPIC_IER_OFFSET => write_ier(val),
        IPIC_IMAP_OFFSET => write_imap(val),
        _ => unreachable!("IPIC has no CSR at offset {offset}"),
    }
}
