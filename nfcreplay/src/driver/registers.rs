// nfcreplay-rs/nfcreplay/src/driver/registers.rs

//! CIU register map and bitfield layouts.
//!
//! Each register is one byte wide, addressed by a 16-bit value sent
//! big-endian on the wire. The layouts below only declare the fields the
//! driver actually touches; unnamed bits pass through untouched when a
//! value is read, modified and written back.

/// Generate a one-byte register value wrapper with per-field accessors.
///
/// Each field line declares a getter, a `with_` builder and an inclusive
/// high..low bit range.
macro_rules! register_value {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident, $with_field:ident: $hi:literal, $lo:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(pub u8);

        impl $name {
            pub fn bits(self) -> u8 {
                self.0
            }

            $(
                pub fn $field(self) -> u8 {
                    (self.0 >> $lo) & Self::mask($hi, $lo)
                }

                pub fn $with_field(self, value: u8) -> Self {
                    let mask = Self::mask($hi, $lo);
                    Self((self.0 & !(mask << $lo)) | ((value & mask) << $lo))
                }
            )+

            const fn mask(hi: u8, lo: u8) -> u8 {
                ((1u16 << (hi - lo + 1)) - 1) as u8
            }
        }

        impl From<u8> for $name {
            fn from(bits: u8) -> Self {
                Self(bits)
            }
        }
    };
}

/// Registers the driver reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Register {
    TxMode = 0x6302,
    RxMode = 0x6303,
    TxControl = 0x6304,
    TxAuto = 0x6305,
    RxThreshold = 0x6308,
    Demod = 0x6309,
    GsNOff = 0x6313,
    TxBitPhase = 0x6315,
    RfCfg = 0x6316,
    GsNOn = 0x6317,
    CwGsP = 0x6318,
    ModGsP = 0x6319,
    Control = 0x633C,
    BitFraming = 0x633D,
}

impl Register {
    pub fn address(self) -> u16 {
        self as u16
    }
}

register_value! {
    /// Transmit data rate and framing
    pub struct TxMode {
        crc_en, with_crc_en: 7, 7;
        speed, with_speed: 6, 4;
        inv_mod, with_inv_mod: 3, 3;
        framing, with_framing: 1, 0;
    }
}

register_value! {
    /// Receive data rate and framing
    pub struct RxMode {
        crc_en, with_crc_en: 7, 7;
        speed, with_speed: 6, 4;
        no_err, with_no_err: 3, 3;
        framing, with_framing: 1, 0;
    }
}

register_value! {
    /// Antenna driver pin TX1/TX2 control
    pub struct TxControl {
        inv_tx2_rf_on, with_inv_tx2_rf_on: 7, 7;
        inv_tx1_rf_on, with_inv_tx1_rf_on: 6, 6;
        tx2_cw, with_tx2_cw: 3, 3;
        tx2_rf_en, with_tx2_rf_en: 1, 1;
        tx1_rf_en, with_tx1_rf_en: 0, 0;
    }
}

register_value! {
    /// Automatic RF field controls
    pub struct TxAuto {
        auto_rf_off, with_auto_rf_off: 7, 7;
        force_100_ask, with_force_100_ask: 6, 6;
        auto_wake_up, with_auto_wake_up: 5, 5;
        ca_on, with_ca_on: 3, 3;
        initial_rf_on, with_initial_rf_on: 2, 2;
    }
}

register_value! {
    /// Receiver decoder thresholds
    pub struct RxThreshold {
        min_level, with_min_level: 7, 4;
        col_level, with_col_level: 2, 0;
    }
}

register_value! {
    /// Demodulator settings
    pub struct Demod {
        add_iq, with_add_iq: 7, 6;
        fix_iq, with_fix_iq: 5, 5;
        tau_rcv, with_tau_rcv: 3, 2;
        tau_sync, with_tau_sync: 1, 0;
    }
}

register_value! {
    /// Driver conductance when the field is off
    pub struct GsNOff {
        cw_gs_n_off, with_cw_gs_n_off: 7, 4;
        mod_gs_n_off, with_mod_gs_n_off: 3, 0;
    }
}

register_value! {
    /// Transmit bit phase adjustment
    pub struct TxBitPhase {
        rcv_clk_change, with_rcv_clk_change: 7, 7;
        tx_bit_phase, with_tx_bit_phase: 6, 0;
    }
}

register_value! {
    /// Receiver gain and RF level detector sensitivity
    pub struct RfCfg {
        rf_level_amp, with_rf_level_amp: 7, 7;
        rx_gain, with_rx_gain: 6, 4;
        rf_level, with_rf_level: 3, 0;
    }
}

register_value! {
    /// N-driver conductance when the field is on
    pub struct GsNOn {
        cw_gs_n_on, with_cw_gs_n_on: 7, 4;
        mod_gs_n_on, with_mod_gs_n_on: 3, 0;
    }
}

register_value! {
    /// P-driver conductance, no modulation
    pub struct CwGsP {
        cw_gs_p, with_cw_gs_p: 5, 0;
    }
}

register_value! {
    /// P-driver conductance during modulation
    pub struct ModGsP {
        mod_gs_p, with_mod_gs_p: 5, 0;
    }
}

register_value! {
    /// Miscellaneous control, including initiator mode
    pub struct Control {
        t_stop_now, with_t_stop_now: 7, 7;
        t_start_now, with_t_start_now: 6, 6;
        initiator, with_initiator: 4, 4;
        rx_last_bits, with_rx_last_bits: 2, 0;
    }
}

register_value! {
    /// Bit-oriented frame adjustments
    pub struct BitFraming {
        start_send, with_start_send: 7, 7;
        rx_align, with_rx_align: 6, 4;
        tx_last_bits, with_tx_last_bits: 2, 0;
    }
}

/// Register values forced for every raw transceive, matching the register
/// state the detection command leaves behind.
pub fn transceive_overrides() -> [(Register, u8); 4] {
    [
        (Register::Control, Control::default().with_initiator(1).bits()),
        (
            Register::TxControl,
            TxControl::default()
                .with_inv_tx2_rf_on(1)
                .with_tx2_rf_en(1)
                .with_tx1_rf_en(1)
                .bits(),
        ),
        (
            Register::RxThreshold,
            RxThreshold::default()
                .with_min_level(0b1000)
                .with_col_level(0b101)
                .bits(),
        ),
        (
            Register::GsNOff,
            GsNOff::default()
                .with_cw_gs_n_off(0b0110)
                .with_mod_gs_n_off(0b1111)
                .bits(),
        ),
    ]
}
