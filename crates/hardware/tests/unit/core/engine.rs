//! Burst read engine tests, driven tick by tick against a scripted
//! memory port.

use std::collections::VecDeque;

use mm2s::common::error::ErrorKind;
use mm2s::core::engine::{EngineState, ReadEngine};
use mm2s::core::types::TransferRequest;
use mm2s::mem::{BurstRequest, MemoryPort, RespBeat};
use rstest::rstest;

const BASE: u64 = 0x8000_0000;

/// Accepts requests on demand and replays a pre-scripted beat sequence,
/// holding each beat until the engine takes it.
struct ScriptedMemory {
    accept_requests: bool,
    requests: Vec<BurstRequest>,
    request_calls: u64,
    beats: VecDeque<RespBeat>,
}

impl ScriptedMemory {
    fn new() -> Self {
        Self {
            accept_requests: true,
            requests: Vec::new(),
            request_calls: 0,
            beats: VecDeque::new(),
        }
    }

    fn with_beats(beats: &[RespBeat]) -> Self {
        let mut mem = Self::new();
        mem.beats = beats.iter().copied().collect();
        mem
    }
}

impl MemoryPort for ScriptedMemory {
    fn name(&self) -> &str {
        "scripted"
    }

    fn request(&mut self, req: &BurstRequest) -> bool {
        self.request_calls += 1;
        if self.accept_requests {
            self.requests.push(*req);
            true
        } else {
            false
        }
    }

    fn response(&self) -> Option<RespBeat> {
        self.beats.front().copied()
    }

    fn take_response(&mut self) {
        self.beats.pop_front();
    }

    fn flush(&mut self) {
        self.beats.clear();
    }
}

fn ok(data: u64, last: bool) -> RespBeat {
    RespBeat {
        data,
        fault: false,
        last,
    }
}

fn faulted() -> RespBeat {
    RespBeat {
        data: 0,
        fault: true,
        last: false,
    }
}

fn step(
    engine: &mut ReadEngine,
    kick: Option<&TransferRequest>,
    can_accept: bool,
    mem: &mut ScriptedMemory,
) -> Option<u64> {
    let (next, push) = engine.compute(kick, can_accept, mem);
    engine.commit(next);
    push
}

/// Steps until the engine pulses done, collecting pushed words.
fn run_to_done(engine: &mut ReadEngine, mem: &mut ScriptedMemory, max_ticks: u64) -> Vec<u64> {
    let mut pushed = Vec::new();
    for _ in 0..max_ticks {
        if engine.done() {
            return pushed;
        }
        pushed.extend(step(engine, None, true, mem));
    }
    panic!("engine did not finish within {} ticks", max_ticks);
}

#[test]
fn zero_length_finishes_clean() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::new();
    let req = TransferRequest::new(BASE, 0, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    assert!(engine.done());
    assert_eq!(engine.error(), None);
    assert_eq!(mem.request_calls, 0);

    step(&mut engine, None, true, &mut mem);
    assert_eq!(engine.state(), EngineState::Idle);
}

#[rstest]
#[case::odd_address(BASE + 4, 16)]
#[case::odd_length(BASE, 12)]
#[case::both_odd(BASE + 1, 3)]
fn misaligned_request_rejected_without_traffic(#[case] addr: u64, #[case] len: u64) {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::new();
    let req = TransferRequest::new(addr, len, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    assert!(engine.done());
    assert_eq!(engine.error(), Some(ErrorKind::Misaligned));
    assert_eq!(mem.request_calls, 0);
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(4, 4)]
#[case(256, 256)]
#[case(300, 256)]
fn burst_count_clamped(#[case] max_burst: u64, #[case] expected: u64) {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::new();
    // 512 words, so the clamp always dominates the remainder.
    let req = TransferRequest::new(BASE, 512 * 8, max_burst);

    step(&mut engine, Some(&req), true, &mut mem);
    step(&mut engine, None, true, &mut mem);
    assert_eq!(mem.requests.len(), 1);
    assert_eq!(mem.requests[0].words, expected);
    assert_eq!(mem.requests[0].addr, BASE);
}

#[test]
fn single_burst_reads_all_words() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(11, false), ok(22, false), ok(33, true)]);
    let req = TransferRequest::new(BASE, 24, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    let pushed = run_to_done(&mut engine, &mut mem, 20);

    assert_eq!(pushed, vec![11, 22, 33]);
    assert_eq!(engine.error(), None);
    assert_eq!(mem.requests.len(), 1);
    assert_eq!(
        mem.requests[0],
        BurstRequest {
            addr: BASE,
            words: 3,
            word_size: 8
        }
    );
}

#[test]
fn multi_burst_advances_address() {
    let mut engine = ReadEngine::new();
    let beats: Vec<RespBeat> = (0..10).map(|i| ok(100 + i, (i + 1) % 4 == 0)).collect();
    let mut mem = ScriptedMemory::with_beats(&beats);
    // 10 words in bursts of at most 4: 4 + 4 + 2.
    let req = TransferRequest::new(BASE, 80, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    let pushed = run_to_done(&mut engine, &mut mem, 40);

    assert_eq!(pushed, (100..110).collect::<Vec<u64>>());
    let summary: Vec<(u64, u64)> = mem.requests.iter().map(|r| (r.addr, r.words)).collect();
    assert_eq!(
        summary,
        vec![(BASE, 4), (BASE + 32, 4), (BASE + 64, 2)]
    );
}

#[test]
fn fault_abandons_rest_of_burst() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(1, false), faulted(), ok(3, true)]);
    let req = TransferRequest::new(BASE, 24, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    step(&mut engine, None, true, &mut mem); // request accepted
    let first = step(&mut engine, None, true, &mut mem);
    assert_eq!(first, Some(1));

    let second = step(&mut engine, None, true, &mut mem);
    assert_eq!(second, None);
    assert!(engine.done());
    assert_eq!(engine.error(), Some(ErrorKind::ResponseFault));

    // The third beat is never drained and no new request goes out.
    let calls = mem.request_calls;
    for _ in 0..5 {
        step(&mut engine, None, true, &mut mem);
    }
    assert_eq!(mem.beats.len(), 1);
    assert_eq!(mem.request_calls, calls);
    assert_eq!(engine.state(), EngineState::Idle);
}

#[test]
fn holds_off_while_buffer_is_full() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(7, true)]);
    let req = TransferRequest::new(BASE, 8, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    step(&mut engine, None, true, &mut mem); // request accepted

    // Buffer full: the beat must stay un-taken, tick after tick.
    for _ in 0..4 {
        let pushed = step(&mut engine, None, false, &mut mem);
        assert_eq!(pushed, None);
        assert_eq!(engine.state(), EngineState::ReceiveData);
        assert_eq!(mem.beats.len(), 1);
    }

    let pushed = step(&mut engine, None, true, &mut mem);
    assert_eq!(pushed, Some(7));
    assert!(engine.done());
}

#[test]
fn request_held_until_accepted() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(9, true)]);
    mem.accept_requests = false;
    let req = TransferRequest::new(BASE, 8, 4);

    step(&mut engine, Some(&req), true, &mut mem);
    for _ in 0..3 {
        step(&mut engine, None, true, &mut mem);
        assert_eq!(engine.state(), EngineState::IssueRequest);
    }
    assert_eq!(mem.request_calls, 3);

    mem.accept_requests = true;
    step(&mut engine, None, true, &mut mem);
    assert_eq!(engine.state(), EngineState::ReceiveData);
}

#[test]
fn error_clears_on_next_kick() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(5, true)]);

    let bad = TransferRequest::new(BASE + 4, 8, 4);
    step(&mut engine, Some(&bad), true, &mut mem);
    assert_eq!(engine.error(), Some(ErrorKind::Misaligned));
    step(&mut engine, None, true, &mut mem); // back to Idle, error sticky
    assert_eq!(engine.error(), Some(ErrorKind::Misaligned));

    let good = TransferRequest::new(BASE, 8, 4);
    step(&mut engine, Some(&good), true, &mut mem);
    assert_eq!(engine.error(), None);
    let pushed = run_to_done(&mut engine, &mut mem, 20);
    assert_eq!(pushed, vec![5]);
}

#[test]
fn busy_in_all_non_idle_states() {
    let mut engine = ReadEngine::new();
    let mut mem = ScriptedMemory::with_beats(&[ok(1, true)]);
    assert!(!engine.busy());

    let req = TransferRequest::new(BASE, 8, 4);
    step(&mut engine, Some(&req), true, &mut mem);
    assert!(engine.busy()); // IssueRequest
    step(&mut engine, None, true, &mut mem);
    assert!(engine.busy()); // ReceiveData
    step(&mut engine, None, true, &mut mem);
    assert!(engine.busy()); // Finished
    step(&mut engine, None, true, &mut mem);
    assert!(!engine.busy());
}
