//! Byte-packed transfer units for narrow interfaces.
//!
//! On the input side one unit carries 4 symbols, symbol `i` in bits
//! `2i..2i+1` (G0 output in the higher bit of the pair). On the output side one
//! unit carries 8 decoded bits, bit `i` of the unit being decoded-bit offset
//! `i`. The last partial unit of a frame is zero-padded, so a frame's symbol
//! count has to travel alongside its units.

use bitvec::prelude::*;

use crate::code::Symbol;
use crate::decoder::{DecoderConfig, Phase, Status, ViterbiDecoder};
use crate::error::{Error, Result};

pub const SYMBOLS_PER_UNIT: usize = 4;
pub const BITS_PER_UNIT: usize = 8;

/// Packs symbols 4 to a byte.
pub fn pack_symbols(symbols: &[Symbol]) -> Vec<u8> {
    let units = symbols.len().div_ceil(SYMBOLS_PER_UNIT);
    let mut packed = bitvec![u8, Lsb0; 0; units * BITS_PER_UNIT];
    for (i, symbol) in symbols.iter().enumerate() {
        let value = symbol.value();
        packed.set(2 * i, value & 0b01 != 0);
        packed.set(2 * i + 1, value & 0b10 != 0);
    }
    packed.into_vec()
}

/// Unpacks the first `count` symbols from packed units.
pub fn unpack_symbols(units: &[u8], count: usize) -> Result<Vec<Symbol>> {
    if count > units.len() * SYMBOLS_PER_UNIT {
        let message = format!("{} symbols requested from {} units", count, units.len());
        return Err(Error::InvalidInput(message));
    }
    let bits = units.view_bits::<Lsb0>();
    Ok(bits
        .chunks_exact(2)
        .take(count)
        .map(|pair| Symbol::from_masked(pair.load_le::<u8>()))
        .collect())
}

/// Packs decoded bits 8 to a byte, LSB first.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let units = bits.len().div_ceil(BITS_PER_UNIT);
    let mut packed = bitvec![u8, Lsb0; 0; units * BITS_PER_UNIT];
    for (i, &bit) in bits.iter().enumerate() {
        packed.set(i, bit);
    }
    packed.into_vec()
}

/// Unpacks the first `count` bits from packed units.
pub fn unpack_bits(units: &[u8], count: usize) -> Result<Vec<bool>> {
    if count > units.len() * BITS_PER_UNIT {
        let message = format!("{} bits requested from {} units", count, units.len());
        return Err(Error::InvalidInput(message));
    }
    Ok(units.view_bits::<Lsb0>()[..count].iter().by_vals().collect())
}

/// [`ViterbiDecoder`] behind a byte-wide interface.
///
/// Transfers follow the same handshake as the wrapped decoder; a unit is
/// accepted only as a whole.
#[derive(Debug, Clone)]
pub struct PackedDecoder {
    inner: ViterbiDecoder,
    /// A unit with fewer than 4 symbols closed the frame's intake.
    partial_unit: bool,
}

impl PackedDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        Ok(Self {
            inner: ViterbiDecoder::new(config)?,
            partial_unit: false,
        })
    }

    pub fn inner(&self) -> &ViterbiDecoder {
        &self.inner
    }

    pub fn status(&self) -> Status {
        self.inner.status()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.partial_unit = false;
    }

    /// Transfers the first `symbols_in_unit` symbols of `unit`.
    ///
    /// Only the final unit of a frame may carry fewer than 4 symbols: after a
    /// partial unit, further units are rejected until [`start`](Self::start).
    /// Fails without transferring anything if the unit would not fit in the
    /// frame.
    pub fn push_unit(&mut self, unit: u8, symbols_in_unit: usize) -> Result<()> {
        if !(1..=SYMBOLS_PER_UNIT).contains(&symbols_in_unit) {
            return Err(Error::InvalidInput(format!(
                "unit must carry 1 to {} symbols, got {}",
                SYMBOLS_PER_UNIT, symbols_in_unit
            )));
        }
        let phase = self.inner.phase();
        if !phase.accepts_symbols() {
            return Err(Error::NotReady(phase.name()));
        }
        if self.partial_unit {
            let message = "a partial unit already ended this frame";
            return Err(Error::InvalidInput(message.to_string()));
        }
        let length = self.inner.buffered() + symbols_in_unit;
        let max_length = self.inner.config().max_frame();
        if length > max_length {
            return Err(Error::FrameOverflow { length, max_length });
        }

        for symbol in unpack_symbols(&[unit], symbols_in_unit)? {
            self.inner.push_symbol(symbol)?;
        }
        self.partial_unit = symbols_in_unit < SYMBOLS_PER_UNIT;
        Ok(())
    }

    /// Closes the frame. See [`ViterbiDecoder::start`].
    pub fn start(&mut self) -> Result<()> {
        self.inner.start()?;
        self.partial_unit = false;
        Ok(())
    }

    /// Reads up to 8 decoded bits as one unit.
    ///
    /// Returns `None` while idle (the previous frame fully read), and
    /// [`Error::OutputNotValid`] while a frame is still being received or
    /// decoded.
    pub fn read_unit(&mut self) -> Result<Option<u8>> {
        if !self.inner.status().out_valid {
            return match self.inner.phase() {
                Phase::Idle => Ok(None),
                _ => Err(Error::OutputNotValid),
            };
        }

        let mut unit = 0u8;
        for offset in 0..BITS_PER_UNIT {
            if !self.inner.status().out_valid {
                break;
            }
            if self.inner.read_bit()? {
                unit |= 1 << offset;
            }
        }
        Ok(Some(unit))
    }

    /// Decodes `num_symbols` packed symbols and returns the packed bits.
    pub fn decode_units(&mut self, units: &[u8], num_symbols: usize) -> Result<Vec<u8>> {
        let symbols = unpack_symbols(units, num_symbols)?;
        let bits = self.inner.decode_frame(&symbols)?;
        log::debug!(
            "decoded {} packed units into {} bits",
            units.len(),
            bits.len()
        );
        Ok(pack_bits(&bits))
    }
}
