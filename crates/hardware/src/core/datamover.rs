//! Top-level datamover: the four machines, the memory port, and the
//! two-phase tick that advances them together.

use crate::config::Config;
use crate::core::buffer::Fifo;
use crate::core::control::{ControlState, TransferControl};
use crate::core::engine::{EngineState, ReadEngine};
use crate::core::stream::StreamStage;
use crate::core::types::{Status, StreamOut, TransferRequest};
use crate::mem::MemoryPort;
use crate::stats::SimStats;

pub struct Datamover {
    pub control: TransferControl,
    pub engine: ReadEngine,
    pub fifo: Fifo,
    pub stream: StreamStage,
    pub mem: Box<dyn MemoryPort>,
    pub stats: SimStats,
    pub trace: bool,
}

impl Datamover {
    pub fn new(mem: Box<dyn MemoryPort>, config: &Config) -> Self {
        Self {
            control: TransferControl::new(),
            engine: ReadEngine::new(),
            fifo: Fifo::new(config.buffer.depth),
            stream: StreamStage::new(),
            mem,
            stats: SimStats::default(),
            trace: config.general.trace || cfg!(feature = "always-trace"),
        }
    }

    /// Issues the edge-triggered start command. Ignored (returning false)
    /// while a transfer is in flight. An accepted start clears the sticky
    /// error and returns every per-transfer register to its power-on
    /// value; words still buffered from an aborted transfer are dropped
    /// and the memory port is flushed so an abandoned burst cannot wedge
    /// the new one.
    pub fn start(&mut self, req: TransferRequest) -> bool {
        if !self.control.start(req) {
            return false;
        }
        self.engine.reset();
        self.fifo.clear();
        self.stream.reset();
        self.mem.flush();
        self.stats.transfers += 1;
        match self.control.state() {
            ControlState::Error => self.stats.transfers_failed += 1,
            ControlState::Done => self.stats.transfers_completed += 1,
            _ => {}
        }
        true
    }

    /// Advances the whole mover by one tick.
    ///
    /// Phase one samples every signal the machines exchange from their
    /// committed state; phase two lets each machine derive its next state
    /// from that snapshot alone; phase three commits all of it at once.
    /// No machine ever observes a neighbor's same-tick update.
    pub fn tick(&mut self, consumer_ready: bool) {
        self.stats.ticks += 1;

        // Sample.
        let fifo_can_accept = self.fifo.can_accept();
        let fifo_has_data = self.fifo.has_data();
        let fifo_front = self.fifo.front();
        let fifo_empty = self.fifo.is_empty();
        let enable = self.control.output_enable();
        let kick = self.control.kick().copied();
        let read_done = self.engine.done();
        let read_error = self.engine.error();
        let beat_waiting = self.mem.response().is_some();

        // Compute.
        let pop = self.stream.will_fetch(consumer_ready, enable, fifo_has_data);
        let last_word = self.control.last_word(pop);
        let emitted = self.stream.accepting(consumer_ready);
        let stream_next = self
            .stream
            .compute(consumer_ready, enable, fifo_front, last_word);
        let (engine_next, push) = self
            .engine
            .compute(kick.as_ref(), fifo_can_accept, self.mem.as_mut());
        let control_next = self.control.compute(pop, read_done, read_error, fifo_empty);

        // Bookkeeping against the still-current state.
        if self.engine.state() == EngineState::IssueRequest
            && engine_next.state == EngineState::ReceiveData
        {
            self.stats.bursts += 1;
        }
        if self.engine.state() == EngineState::ReceiveData && beat_waiting && !fifo_can_accept {
            self.stats.resp_stalls += 1;
        }
        if self.stream.output().valid && !consumer_ready {
            self.stats.out_stalls += 1;
        }
        if push.is_some() {
            self.stats.words_read += 1;
        }
        if pop {
            self.stats.words_sent += 1;
        }
        if emitted {
            self.stats.words_out += 1;
        }
        if control_next.state == ControlState::Done && self.control.state() != ControlState::Done {
            self.stats.transfers_completed += 1;
        }
        if control_next.state == ControlState::Error && self.control.state() != ControlState::Error
        {
            self.stats.transfers_failed += 1;
        }

        // Commit.
        self.fifo.commit(push, pop);
        self.stream.commit(stream_next);
        self.engine.commit(engine_next);
        self.control.commit(control_next);
        self.mem.tick();

        if self.trace {
            self.print_trace_line(consumer_ready);
        }
    }

    /// The registered stream offer; stable across ticks while the
    /// consumer stalls.
    pub fn output(&self) -> StreamOut {
        self.stream.output()
    }

    pub fn status(&self) -> Status {
        self.control.status()
    }

    /// Unconditional return to power-on state. In-flight bursts and
    /// buffered words are discarded.
    pub fn reset(&mut self) {
        self.control.reset();
        self.engine.reset();
        self.fifo.clear();
        self.stream.reset();
        self.mem.flush();
    }

    fn print_trace_line(&self, consumer_ready: bool) {
        let out = self.stream.output();
        eprintln!(
            "T{:<6} ctl={:?} eng={:?} fifo={}/{} sent={}/{} out={}{} data={:#018x} rdy={}",
            self.stats.ticks,
            self.control.state(),
            self.engine.state(),
            self.fifo.level(),
            self.fifo.depth(),
            self.control.words_sent(),
            self.control.total_words(),
            if out.valid { 'v' } else { '-' },
            if out.last { 'l' } else { '-' },
            out.data,
            u8::from(consumer_ready),
        );
    }
}
