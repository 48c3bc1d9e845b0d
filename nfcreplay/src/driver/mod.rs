// nfcreplay-rs/nfcreplay/src/driver/mod.rs

//! Wire protocol driver for the serial reader/controller.
//!
//! The protocol is strictly half-duplex request/response: one command frame
//! out, ACK and one response frame back. [`Pn532`] owns the connection and
//! its caches; callers needing concurrency must serialize access around the
//! whole handle.

pub mod commands;
pub mod frame;
pub mod registers;
pub mod tag;

pub use commands::{BrTy, Command, Modulation, RfConfigItem};
pub use tag::{Target, TypeATarget, TypeBTarget};

use std::collections::HashMap;

use crate::constants::{ACK_FRAME, LONG_PREAMBLE_LEN, PN532_IC_VERSION, TFI_DEVICE_TO_HOST, WIRE_SOF};
use crate::reader::{Reader, TransceiveConfiguration};
use crate::transport::Transport;
use crate::types::ExpectedApdu;
use crate::utils::bytes_to_hex;
use crate::{Error, Result};
use commands::{bitrate_code, power_preset, timeout_index, STATUS_OK};
use frame::{dcs, lcs, Frame};
use registers::{
    BitFraming, CwGsP, Demod, GsNOn, ModGsP, Register, RfCfg, RxMode, TxAuto, TxBitPhase, TxMode,
};
use tag::expected_matches;

/// Default timeout for register, configuration and short commands.
const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 500;
/// SAM configuration right after power-up can be slow.
const SAM_CONFIGURATION_TIMEOUT_MS: u64 = 1_000;
/// Raw transceive waits on the RF side, bounded by the hardware timeout.
const COMMUNICATE_THRU_TIMEOUT_MS: u64 = 1_000;
/// Tag data exchanges may span multiple RF frames.
const DATA_EXCHANGE_TIMEOUT_MS: u64 = 5_000;

/// Registers read back before a raw transceive, in wire order.
const TRANSCEIVE_READ_SET: [Register; 10] = [
    Register::TxMode,
    Register::RxMode,
    Register::TxAuto,
    Register::BitFraming,
    Register::GsNOn,
    Register::CwGsP,
    Register::ModGsP,
    Register::RfCfg,
    Register::TxBitPhase,
    Register::Demod,
];

/// Driver handle for one open controller connection.
pub struct Pn532<T: Transport> {
    transport: T,
    /// On until the connection is verified; the device needs the extra
    /// zero-byte run to synchronize before its first configuration
    write_long_preamble: bool,
    register_cache: HashMap<Register, u8>,
    rf_config_cache: HashMap<RfConfigItem, Vec<u8>>,
    active_target: Option<u8>,
}

impl<T: Transport> Pn532<T> {
    /// Open and verify a connection over `transport`: wake the device with
    /// an ACK, check the firmware IC version, configure the SAM, then drop
    /// the long preamble and zero out detection retries.
    pub fn open(transport: T) -> Result<Self> {
        let mut device = Self {
            transport,
            write_long_preamble: true,
            register_cache: HashMap::new(),
            rf_config_cache: HashMap::new(),
            active_target: None,
        };
        device.transport.flush_output()?;
        device.send_ack()?;
        device.transport.flush_input()?;
        device.verify_firmware_version()?;
        device.sam_configuration(0x01, 0x00)?;
        device.write_long_preamble = false;
        device.transport.flush_input()?;
        // Retries are caller policy, not driver behavior
        device.rf_configuration(RfConfigItem::MaxRetries, &[0x00, 0x00, 0x00], false)?;
        Ok(device)
    }

    /// Give the transport back, dropping the handle.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn verify_firmware_version(&mut self) -> Result<()> {
        log::debug!("checking firmware version");
        let rsp = self.get_firmware_version()?;
        if rsp[0] != PN532_IC_VERSION {
            return Err(Error::MalformedFrame(format!(
                "unexpected IC version {:#04x}",
                rsp[0]
            )));
        }
        Ok(())
    }

    /// (7.2.2) GetFirmwareVersion
    pub fn get_firmware_version(&mut self) -> Result<Vec<u8>> {
        let rsp = self.execute_command(
            Command::GetFirmwareVersion,
            &[],
            DEFAULT_COMMAND_TIMEOUT_MS,
            Some(4),
        )?;
        rsp.ok_or(Error::NoResponse {
            command: Command::GetFirmwareVersion.opcode(),
        })
    }

    /// (7.2.10) SAMConfiguration
    pub fn sam_configuration(&mut self, mode: u8, timeout_value: u8) -> Result<()> {
        self.execute_command(
            Command::SamConfiguration,
            &[mode, timeout_value],
            SAM_CONFIGURATION_TIMEOUT_MS,
            Some(0),
        )?;
        Ok(())
    }

    /// (7.3.1) RFConfiguration: apply settings to one configuration item.
    /// With `cache` set, a write identical to the last one is skipped.
    pub fn rf_configuration(
        &mut self,
        cfg_item: RfConfigItem,
        value: &[u8],
        cache: bool,
    ) -> Result<()> {
        if cache && self.rf_config_cache.get(&cfg_item).map(Vec::as_slice) == Some(value) {
            return Ok(());
        }
        let mut args = vec![cfg_item as u8];
        args.extend_from_slice(value);
        self.execute_command(
            Command::RfConfiguration,
            &args,
            DEFAULT_COMMAND_TIMEOUT_MS,
            Some(0),
        )?;
        self.rf_config_cache.insert(cfg_item, value.to_vec());
        Ok(())
    }

    /// (7.2.4) ReadRegister: batched CIU register read.
    ///
    /// With `cache` set and every requested register previously observed,
    /// no wire traffic happens at all. Fresh reads populate the cache.
    pub fn read_registers(&mut self, registers: &[Register], cache: bool) -> Result<Vec<u8>> {
        if cache
            && registers
                .iter()
                .all(|reg| self.register_cache.contains_key(reg))
        {
            return Ok(registers
                .iter()
                .map(|reg| self.register_cache[reg])
                .collect());
        }
        let mut args = Vec::with_capacity(registers.len() * 2);
        for reg in registers {
            args.extend_from_slice(&reg.address().to_be_bytes());
        }
        let rsp = self
            .execute_command(
                Command::ReadRegister,
                &args,
                DEFAULT_COMMAND_TIMEOUT_MS,
                Some(registers.len()),
            )?
            .ok_or(Error::NoResponse {
                command: Command::ReadRegister.opcode(),
            })?;
        for (reg, &value) in registers.iter().zip(&rsp) {
            self.register_cache.insert(*reg, value);
        }
        Ok(rsp[..registers.len()].to_vec())
    }

    /// (7.2.5) WriteRegister: batched CIU register write.
    ///
    /// With `cache` set, registers whose cached value already equals the
    /// requested one are dropped from the wire payload.
    pub fn write_registers(&mut self, writes: &[(Register, u8)], cache: bool) -> Result<()> {
        let difference: Vec<(Register, u8)> = writes
            .iter()
            .filter(|(reg, val)| !cache || self.register_cache.get(reg) != Some(val))
            .copied()
            .collect();
        if difference.is_empty() {
            return Ok(());
        }
        let mut args = Vec::with_capacity(difference.len() * 3);
        for (reg, val) in &difference {
            args.extend_from_slice(&reg.address().to_be_bytes());
            args.push(*val);
        }
        self.execute_command(
            Command::WriteRegister,
            &args,
            DEFAULT_COMMAND_TIMEOUT_MS,
            None,
        )?;
        for (reg, val) in writes {
            self.register_cache.insert(*reg, *val);
        }
        Ok(())
    }

    /// (7.3.5) InListPassiveTarget: detect up to `max_tg` targets.
    ///
    /// Detection resets device-side register state, so both caches are
    /// cleared first. Zero targets (or a silent device) is an empty list,
    /// not an error.
    pub fn in_list_passive_target(
        &mut self,
        br_ty: BrTy,
        initiator_data: &[u8],
        max_tg: u8,
    ) -> Result<Vec<Target>> {
        self.register_cache.clear();
        self.rf_config_cache.clear();
        self.active_target = None;

        let mut args = vec![max_tg, br_ty as u8];
        args.extend_from_slice(initiator_data);
        let Some(rsp) = self.execute_command(
            Command::InListPassiveTarget,
            &args,
            DEFAULT_COMMAND_TIMEOUT_MS,
            None,
        )?
        else {
            return Ok(Vec::new());
        };
        if rsp.first().copied().unwrap_or(0) == 0 {
            return Ok(Vec::new());
        }
        let data = &rsp[1..];

        let mut targets = Vec::new();
        let mut offset = 0;
        while offset < data.len() && targets.len() < max_tg as usize {
            let (target, consumed) = match br_ty {
                BrTy::TypeA106 => TypeATarget::from_target_data(&data[offset..])
                    .map(|(t, n)| (Target::TypeA(t), n))?,
                BrTy::TypeB106 => TypeBTarget::from_target_data(&data[offset..])
                    .map(|(t, n)| (Target::TypeB(t), n))?,
                other => {
                    return Err(Error::UnsupportedModulation(format!(
                        "target decoding for {:?}",
                        other
                    )));
                }
            };
            offset += consumed;
            targets.push(target);
        }
        self.active_target = targets.first().map(Target::target_id);
        Ok(targets)
    }

    /// (7.3.8) InDataExchange: ISO-DEP exchange with a detected target.
    pub fn in_data_exchange(&mut self, tg: u8, data: &[u8], timeout_ms: u64) -> Result<Vec<u8>> {
        let mut args = vec![tg];
        args.extend_from_slice(data);
        let rsp = self
            .execute_command(Command::InDataExchange, &args, timeout_ms, None)?
            .ok_or(Error::NoResponse {
                command: Command::InDataExchange.opcode(),
            })?;
        match rsp.split_first() {
            Some((&STATUS_OK, payload)) => Ok(payload.to_vec()),
            Some((&status, _)) => Err(Error::ErrorStatus { status }),
            None => Err(Error::ResponseTooShort {
                command: Command::InDataExchange.opcode(),
                min: 1,
                actual: 0,
            }),
        }
    }

    /// (7.3.9) InCommunicateThru: raw RF exchange. A non-OK status byte is
    /// expected when nobody answers a broadcast; it yields `None`.
    pub fn in_communicate_thru(&mut self, data: &[u8], timeout_ms: u64) -> Result<Option<Vec<u8>>> {
        let rsp = self
            .execute_command(Command::InCommunicateThru, data, timeout_ms, Some(1))?
            .ok_or(Error::NoResponse {
                command: Command::InCommunicateThru.opcode(),
            })?;
        if rsp[0] != STATUS_OK {
            log::debug!("communicate-thru status {:#04x}, no data", rsp[0]);
            return Ok(None);
        }
        Ok(Some(rsp[1..].to_vec()))
    }

    /// Configure the CIU and emit one free-form frame into the polling
    /// loop. With `cache_configuration` set, redundant register reads and
    /// writes between consecutive broadcasts are skipped.
    pub fn transceive_raw(
        &mut self,
        data: &[u8],
        config: &TransceiveConfiguration,
        cache_configuration: bool,
    ) -> Result<Option<Vec<u8>>> {
        self.rf_configuration(
            RfConfigItem::VariousTimings,
            &[
                0x00, // RFU
                0x0B, // ATR_RES timeout, default value
                timeout_index(config.timeout),
            ],
            cache_configuration,
        )?;

        let (p_conductance, n_conductance) = power_preset(config.power_level);
        let speed = bitrate_code(config.bitrate_kbps)?;
        let framing = config.modulation.framing();
        let crc = config.crc as u8;

        let values = self.read_registers(&TRANSCEIVE_READ_SET, cache_configuration)?;
        let (tx_mode, rx_mode, tx_auto, bit_frm) = (
            TxMode(values[0]),
            RxMode(values[1]),
            TxAuto(values[2]),
            BitFraming(values[3]),
        );
        let (gs_n_on, cw_gs_p, mod_gs_p) = (GsNOn(values[4]), CwGsP(values[5]), ModGsP(values[6]));
        let (rf_cfg, tx_bit_phase, demod) =
            (RfCfg(values[7]), TxBitPhase(values[8]), Demod(values[9]));

        let is_a = config.modulation == Modulation::TypeA;
        let is_b = config.modulation == Modulation::TypeB;
        let is_f = config.modulation == Modulation::TypeF;

        // Field values mirror the register state left behind by target
        // detection followed by communication
        let mut writes = vec![
            (
                Register::TxMode,
                tx_mode
                    .with_crc_en(crc)
                    .with_speed(speed)
                    .with_framing(framing)
                    .bits(),
            ),
            (
                Register::RxMode,
                rx_mode
                    .with_crc_en(crc)
                    .with_speed(speed)
                    .with_framing(framing)
                    .bits(),
            ),
            (Register::TxAuto, tx_auto.with_force_100_ask(is_a as u8).bits()),
            (
                Register::BitFraming,
                bit_frm.with_tx_last_bits(config.bits & 0b111).bits(),
            ),
            (
                Register::GsNOn,
                gs_n_on
                    .with_mod_gs_n_on(if is_a { 0b0100 } else { 0b1111 })
                    .with_cw_gs_n_on(n_conductance & 0b1111)
                    .bits(),
            ),
            (
                Register::CwGsP,
                cw_gs_p.with_cw_gs_p(p_conductance & 0b111111).bits(),
            ),
            (
                Register::ModGsP,
                mod_gs_p
                    .with_mod_gs_p(if is_b { 0b010111 } else { 0b010001 })
                    .bits(),
            ),
            (
                Register::RfCfg,
                rf_cfg
                    .with_rx_gain(if is_f { 0b110 } else { 0b101 })
                    .with_rf_level(0b1001)
                    .bits(),
            ),
            (
                Register::TxBitPhase,
                tx_bit_phase
                    .with_rcv_clk_change(1)
                    .with_tx_bit_phase(if is_f { 0b1111 } else { 0b0111 })
                    .bits(),
            ),
            (
                Register::Demod,
                demod
                    .with_add_iq(0b01)
                    .with_tau_rcv(if is_f { 0b00 } else { 0b11 })
                    .with_tau_sync(0b01)
                    .bits(),
            ),
        ];
        writes.extend_from_slice(&registers::transceive_overrides());
        self.write_registers(&writes, cache_configuration)?;

        // Type F frames carry their own length byte, counting itself
        let payload;
        let data = if is_f {
            payload = {
                let mut v = Vec::with_capacity(data.len() + 1);
                v.push((data.len() + 1) as u8);
                v.extend_from_slice(data);
                v
            };
            payload.as_slice()
        } else {
            data
        };

        self.in_communicate_thru(data, COMMUNICATE_THRU_TIMEOUT_MS)
    }

    fn execute_command(
        &mut self,
        command: Command,
        args: &[u8],
        timeout_ms: u64,
        min_response: Option<usize>,
    ) -> Result<Option<Vec<u8>>> {
        let mut payload = vec![command.opcode()];
        payload.extend_from_slice(args);
        let frame = Frame::encode(&payload, self.write_long_preamble)?;
        log::debug!("sending {:?} frame {}", command, bytes_to_hex(&frame));
        self.transport.send(&frame)?;

        let Some(mut rsp) = self.read_response(timeout_ms)? else {
            if min_response.is_some() {
                return Err(Error::NoResponse {
                    command: command.opcode(),
                });
            }
            return Ok(None);
        };
        if rsp.first() != Some(&command.response_opcode()) {
            return Err(Error::OpcodeMismatch {
                command: command.opcode(),
                actual: rsp.first().copied().unwrap_or(0),
            });
        }
        rsp.remove(0);
        if let Some(min) = min_response {
            if rsp.len() < min {
                return Err(Error::ResponseTooShort {
                    command: command.opcode(),
                    min,
                    actual: rsp.len(),
                });
            }
        }
        Ok(Some(rsp))
    }

    /// Read ACK plus one device frame. Every validation failure is logged
    /// and reported as "no data"; only transport failures raise.
    fn read_response(&mut self, timeout_ms: u64) -> Result<Option<Vec<u8>>> {
        let ack = self.transport.receive(ACK_FRAME.len(), timeout_ms)?;
        if ack.is_empty() {
            log::error!("no response from device");
            return Ok(None);
        }
        if ack != ACK_FRAME {
            log::error!("expected ACK, got {}", bytes_to_hex(&ack));
            return Ok(None);
        }

        // SOF(3) + len + lcs + TFI
        let header = self.transport.receive(6, timeout_ms)?;
        if header.is_empty() {
            return Ok(None);
        }
        if header.len() < 6 || header[..3] != WIRE_SOF {
            log::error!("unexpected start of frame: {}", bytes_to_hex(&header));
            return Ok(None);
        }
        let len = header[3];
        if header[4] != lcs(len) {
            log::error!("frame failed length checksum");
            return Ok(None);
        }
        if len == 0 {
            log::error!("device frame with empty body");
            return Ok(None);
        }
        if header[5] != TFI_DEVICE_TO_HOST {
            log::error!("unexpected TFI byte {:#04x}", header[5]);
            return Ok(None);
        }

        // Payload (len counts TFI) + DCS + postamble
        let rest_len = (len as usize - 1) + 2;
        let rest = self.transport.receive(rest_len, timeout_ms)?;
        if rest.len() < rest_len {
            log::error!(
                "short frame body: wanted {} bytes, got {}",
                rest_len,
                rest.len()
            );
            return Ok(None);
        }
        let payload = &rest[..len as usize - 1];
        let mut body = vec![TFI_DEVICE_TO_HOST];
        body.extend_from_slice(payload);
        if rest[len as usize - 1] != dcs(&body) {
            log::error!("frame failed data checksum");
            return Ok(None);
        }
        if rest[len as usize] != 0x00 {
            log::error!("unexpected postamble byte {:#04x}", rest[len as usize]);
            return Ok(None);
        }

        self.send_ack()?;
        log::debug!(
            "received frame {}{}",
            bytes_to_hex(&header),
            bytes_to_hex(&rest)
        );
        Ok(Some(payload.to_vec()))
    }

    fn send_ack(&mut self) -> Result<()> {
        if self.write_long_preamble {
            let mut buf = vec![0u8; LONG_PREAMBLE_LEN];
            buf.extend_from_slice(&ACK_FRAME);
            self.transport.send(&buf)
        } else {
            self.transport.send(&ACK_FRAME)
        }
    }
}

impl<T: Transport> Reader for Pn532<T> {
    fn poll_a(&mut self) -> Result<Option<TypeATarget>> {
        log::debug!("polling A");
        let targets = self.in_list_passive_target(BrTy::TypeA106, &[], 1)?;
        Ok(targets.into_iter().find_map(|t| match t {
            Target::TypeA(tag) => Some(tag),
            Target::TypeB(_) => None,
        }))
    }

    fn poll_b(&mut self, afi: u8) -> Result<Option<TypeBTarget>> {
        log::debug!("polling B");
        let targets = self.in_list_passive_target(BrTy::TypeB106, &[afi], 1)?;
        Ok(targets.into_iter().find_map(|t| match t {
            Target::TypeB(tag) => Some(tag),
            Target::TypeA(_) => None,
        }))
    }

    fn send_broadcast(
        &mut self,
        data: &[u8],
        configuration: &TransceiveConfiguration,
    ) -> Result<Option<Vec<u8>>> {
        log::debug!("sending broadcast {}", bytes_to_hex(data));
        self.transceive_raw(data, configuration, true)
    }

    fn mute(&mut self) -> Result<()> {
        log::debug!("muting");
        self.active_target = None;
        self.rf_configuration(RfConfigItem::RfField, &[0b10], false)
    }

    fn unmute(&mut self) -> Result<()> {
        log::debug!("unmuting");
        self.rf_configuration(RfConfigItem::RfField, &[0b01], false)
    }

    fn reset(&mut self) -> Result<()> {
        self.transport.flush_input()?;
        self.transport.flush_output()
    }

    fn transact(&mut self, commands: &[Vec<u8>], responses: &[ExpectedApdu]) -> Result<bool> {
        let target = self.active_target.ok_or(Error::NoTarget)?;
        log::debug!("starting transaction with {} pairs", commands.len());
        // All-blank expectations mean "no response expected": finding the
        // tag was already the success condition
        if responses.iter().all(ExpectedApdu::is_blank) {
            return Ok(true);
        }
        for (command, expected) in commands.iter().zip(responses) {
            let actual = match self.in_data_exchange(target, command, DATA_EXCHANGE_TIMEOUT_MS) {
                Ok(data) => Some(data),
                Err(Error::ErrorStatus { status }) => {
                    log::error!("data exchange failed with status {:#04x}", status);
                    None
                }
                Err(Error::NoResponse { .. }) => None,
                Err(e) => return Err(e),
            };
            if !expected_matches(expected, actual.as_deref()) {
                log::error!(
                    "unexpected APDU: received {}, expected {:?}",
                    actual.as_deref().map(bytes_to_hex).unwrap_or_default(),
                    expected,
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
