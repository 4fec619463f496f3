//! Tick-driven control state machine with a ready/valid/acknowledge handshake.
//!
//! ```text
//!   Idle --symbol--> Receiving --start--> Decoding --all symbols--> Traceback
//!    ^                                                                  |
//!    +------------ last bit acknowledged (frame_done) <-- Output <------+
//! ```
//!
//! Every call to [`ViterbiDecoder::tick`] is one synchronization point. A
//! symbol transfers only on a tick where the caller asserts `symbol_valid` and
//! the decoder reports `rx_ready`; a decoded bit advances only on a tick where
//! the caller asserts `ack` while `out_valid` is high. Transfers the handshake
//! does not allow are ignored.
//!
//! The ACS engine advances one buffered symbol per tick while the frame is
//! still being received, so after `start` only the last symbol or so remains
//! to be processed. Intake stays closed from `start` until the last decoded
//! bit has been acknowledged; the next frame can be pushed on the tick that
//! reports `frame_done`, with no reset in between.
//!
//! Frame overflow is rejected: `rx_ready` stays low once `max_frame` symbols
//! are buffered, and [`ViterbiDecoder::push_symbol`] returns
//! [`Error::FrameOverflow`].

use super::acs::{AcsEngine, Metric};
use super::history::DecisionHistory;
use super::traceback::{traceback_into, TracebackStart};
use crate::code::{CodeParams, Symbol, MAX_FRAME};
use crate::error::{Error, Result};
use log::{debug, warn};

/// Build-time configuration of a decoder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    params: CodeParams,
    max_frame: usize,
    traceback_start: TracebackStart,
}

impl DecoderConfig {
    /// `params` with a [`MAX_FRAME`]-symbol frame and best-metric traceback.
    pub fn new(params: CodeParams) -> Self {
        Self {
            params,
            max_frame: MAX_FRAME,
            traceback_start: TracebackStart::BestMetric,
        }
    }

    /// Sets the maximum frame length in symbols, tail included.
    pub fn with_max_frame(mut self, max_frame: usize) -> Self {
        self.max_frame = max_frame;
        self
    }

    /// Selects the traceback starting state strategy.
    pub fn with_traceback_start(mut self, traceback_start: TracebackStart) -> Self {
        self.traceback_start = traceback_start;
        self
    }

    /// A frame must be able to hold the tail plus at least one data symbol,
    /// and its decision history must fit in one bit vector.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame <= self.params.memory() {
            return Err(Error::InvalidInput(format!(
                "Maximum frame length {} must exceed the tail length {}",
                self.max_frame,
                self.params.memory()
            )));
        }
        let max_capacity = DecisionHistory::max_capacity(self.params.num_states());
        if self.max_frame > max_capacity {
            return Err(Error::InvalidInput(format!(
                "Maximum frame length {} exceeds the history limit of {} steps",
                self.max_frame, max_capacity
            )));
        }
        Ok(())
    }

    pub fn params(&self) -> &CodeParams {
        &self.params
    }

    pub fn max_frame(&self) -> usize {
        self.max_frame
    }

    pub fn traceback_start(&self) -> TracebackStart {
        self.traceback_start
    }
}

/// Control phase of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No symbols buffered; ready for a new frame.
    Idle,
    /// Buffering symbols of the current frame.
    Receiving,
    /// Finishing the ACS recursion over the buffered symbols.
    Decoding,
    /// Reconstructing the frame's bits.
    Traceback,
    /// Presenting decoded bit `index` until it is acknowledged.
    Output { index: usize },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Receiving => "receiving",
            Phase::Decoding => "decoding",
            Phase::Traceback => "traceback",
            Phase::Output { .. } => "output",
        }
    }

    /// Whether symbols can be transferred in this phase (buffer space aside).
    pub fn accepts_symbols(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Receiving)
    }
}

/// Signals driven by the caller for one tick.
///
/// When `symbol_valid` and `start` are asserted on the same tick the symbol is
/// accepted first and belongs to the frame being closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub symbol_valid: bool,
    pub symbol: Symbol,
    pub start: bool,
    pub ack: bool,
}

impl Inputs {
    /// Presents `symbol` for one tick.
    pub fn with_symbol(symbol: Symbol) -> Self {
        Self {
            symbol_valid: true,
            symbol,
            ..Self::default()
        }
    }

    /// Pulses start for one tick.
    pub fn start_pulse() -> Self {
        Self {
            start: true,
            ..Self::default()
        }
    }

    /// Pulses acknowledge for one tick.
    pub fn ack_pulse() -> Self {
        Self {
            ack: true,
            ..Self::default()
        }
    }
}

/// Status signals after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// A symbol presented on the next tick will be accepted.
    pub rx_ready: bool,
    /// `out_bit` holds a decoded bit waiting for acknowledge.
    pub out_valid: bool,
    pub out_bit: bool,
    /// Decoding or traceback in progress.
    pub busy: bool,
    /// High for exactly one tick after the last bit of a frame is acknowledged.
    pub frame_done: bool,
}

/// Summary of the most recently traced frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Symbols in the frame, tail included.
    pub symbols: usize,
    /// State the traceback started from.
    pub terminal_state: usize,
    /// Path metric of that state: the Hamming distance between the received
    /// symbols and the re-encoded survivor path.
    pub path_metric: Metric,
}

/// Streaming Viterbi decoder for one frame at a time.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    config: DecoderConfig,
    phase: Phase,
    acs: AcsEngine,
    history: DecisionHistory,
    buffer: Vec<Symbol>,
    output: Vec<bool>,
    frame_done: bool,
    last_report: Option<FrameReport>,
}

impl ViterbiDecoder {
    /// Creates a decoder in the idle phase.
    ///
    /// # Returns
    ///
    /// The decoder, or an error if the configuration is invalid.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        let params = config.params;
        Ok(Self {
            config,
            phase: Phase::Idle,
            acs: AcsEngine::new(&params),
            history: DecisionHistory::new(params.num_states(), config.max_frame),
            buffer: Vec::with_capacity(config.max_frame),
            output: Vec::with_capacity(config.max_frame),
            frame_done: false,
            last_report: None,
        })
    }

    /// Decoder for `params` with the default configuration.
    pub fn with_params(params: CodeParams) -> Result<Self> {
        Self::new(DecoderConfig::new(params))
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Symbols buffered for the current frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Current path metrics of the frame in progress.
    pub fn metrics(&self) -> &[Metric] {
        self.acs.metrics()
    }

    pub fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }

    /// Status signals as of the last tick.
    pub fn status(&self) -> Status {
        let (out_valid, out_bit) = match self.phase {
            Phase::Output { index } => (true, self.output[index]),
            _ => (false, false),
        };
        Status {
            rx_ready: self.rx_ready(),
            out_valid,
            out_bit,
            busy: matches!(self.phase, Phase::Decoding | Phase::Traceback),
            frame_done: self.frame_done,
        }
    }

    fn rx_ready(&self) -> bool {
        self.phase.accepts_symbols() && self.buffer.len() < self.config.max_frame
    }

    fn pending(&self) -> usize {
        self.buffer.len() - self.history.len()
    }

    /// Advances the machine by one synchronization point.
    pub fn tick(&mut self, inputs: &Inputs) -> Status {
        self.frame_done = false;

        if inputs.symbol_valid && !self.phase.accepts_symbols() {
            warn!("symbol presented while {}; ignored", self.phase.name());
        }

        match self.phase {
            Phase::Idle | Phase::Receiving => self.tick_intake(inputs),
            Phase::Decoding => {
                self.advance_acs();
                if self.pending() == 0 {
                    self.phase = Phase::Traceback;
                }
            }
            Phase::Traceback => self.run_traceback(),
            Phase::Output { index } => {
                if inputs.ack {
                    self.advance_output(index);
                }
            }
        }

        self.status()
    }

    fn tick_intake(&mut self, inputs: &Inputs) {
        self.advance_acs();

        if inputs.symbol_valid {
            if self.rx_ready() {
                if self.phase == Phase::Idle {
                    debug!("frame started");
                    self.phase = Phase::Receiving;
                }
                self.buffer.push(inputs.symbol);
            } else {
                warn!(
                    "symbol presented with a full frame of {} symbols; ignored",
                    self.buffer.len()
                );
            }
        }

        if inputs.start {
            let length = self.buffer.len();
            let memory = self.config.params.memory();
            if length == 0 {
                warn!("start with an empty frame; ignored");
                return;
            }
            if length < memory {
                warn!(
                    "start with {} symbols, fewer than the {}-symbol tail",
                    length, memory
                );
            }
            debug!("frame closed with {} symbols", length);
            self.phase = Phase::Decoding;
        }
    }

    /// Runs the oldest unprocessed buffered symbol through the ACS engine.
    fn advance_acs(&mut self) {
        let step = self.history.len();
        let Some(&symbol) = self.buffer.get(step) else {
            return;
        };
        if let Some(row) = self.history.push_row() {
            self.acs.step(symbol, row);
        }
    }

    fn run_traceback(&mut self) {
        let memory = self.config.params.memory();
        let start = self.config.traceback_start.resolve(self.acs.metrics());
        let report = FrameReport {
            symbols: self.history.len(),
            terminal_state: start,
            path_metric: self.acs.metrics()[start],
        };
        debug!(
            "traceback from state {} ({:?}), path metric {}",
            start, self.config.traceback_start, report.path_metric
        );

        traceback_into(&self.history, memory, start, &mut self.output);
        self.last_report = Some(report);

        if self.output.is_empty() {
            self.finish_frame();
        } else {
            self.phase = Phase::Output { index: 0 };
        }
    }

    fn advance_output(&mut self, index: usize) {
        let next = index + 1;
        if next < self.output.len() {
            self.phase = Phase::Output { index: next };
        } else {
            self.finish_frame();
        }
    }

    fn finish_frame(&mut self) {
        debug!("frame done, {} bits delivered", self.output.len());
        self.frame_done = true;
        self.clear_frame();
    }

    fn clear_frame(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.output.clear();
        self.acs.reset();
        self.phase = Phase::Idle;
    }

    /// Abandons the frame in progress and returns to idle.
    pub fn reset(&mut self) {
        if self.phase != Phase::Idle {
            debug!("reset during {}", self.phase.name());
        }
        self.frame_done = false;
        self.clear_frame();
    }

    /// Transfers one symbol, ticking once.
    ///
    /// Fails with [`Error::NotReady`] while a frame is being decoded or
    /// drained, and with [`Error::FrameOverflow`] once the frame is full.
    pub fn push_symbol(&mut self, symbol: Symbol) -> Result<()> {
        if !self.phase.accepts_symbols() {
            return Err(Error::NotReady(self.phase.name()));
        }
        if self.buffer.len() >= self.config.max_frame {
            return Err(Error::FrameOverflow {
                length: self.buffer.len() + 1,
                max_length: self.config.max_frame,
            });
        }
        self.tick(&Inputs::with_symbol(symbol));
        Ok(())
    }

    /// Closes the frame and ticks until its first bit is valid (or, for a
    /// frame without data bits, until it completes).
    ///
    /// Fails with [`Error::EmptyFrame`] or [`Error::ShortFrame`] without
    /// changing state.
    pub fn start(&mut self) -> Result<()> {
        if !self.phase.accepts_symbols() {
            return Err(Error::NotReady(self.phase.name()));
        }
        let length = self.buffer.len();
        let memory = self.config.params.memory();
        if length == 0 {
            return Err(Error::EmptyFrame);
        }
        if length < memory {
            return Err(Error::ShortFrame {
                length,
                min_length: memory,
            });
        }

        self.tick(&Inputs::start_pulse());
        while self.status().busy {
            self.tick(&Inputs::default());
        }
        Ok(())
    }

    /// Returns the visible decoded bit and acknowledges it.
    pub fn read_bit(&mut self) -> Result<bool> {
        let Phase::Output { index } = self.phase else {
            return Err(Error::OutputNotValid);
        };
        let bit = self.output[index];
        self.tick(&Inputs::ack_pulse());
        Ok(bit)
    }

    /// Runs a whole frame through the handshake: push, start, drain.
    ///
    /// The frame is checked before any symbol is transferred, so a rejected
    /// frame leaves the decoder idle.
    pub fn decode_frame(&mut self, symbols: &[Symbol]) -> Result<Vec<bool>> {
        if self.phase != Phase::Idle {
            return Err(Error::NotReady(self.phase.name()));
        }
        let memory = self.config.params.memory();
        if symbols.len() > self.config.max_frame {
            return Err(Error::FrameOverflow {
                length: symbols.len(),
                max_length: self.config.max_frame,
            });
        }
        if symbols.is_empty() {
            return Err(Error::EmptyFrame);
        }
        if symbols.len() < memory {
            return Err(Error::ShortFrame {
                length: symbols.len(),
                min_length: memory,
            });
        }

        for &symbol in symbols {
            self.push_symbol(symbol)?;
        }
        self.start()?;

        let mut bits = Vec::with_capacity(symbols.len() - memory);
        while self.status().out_valid {
            bits.push(self.read_bit()?);
        }
        Ok(bits)
    }
}
