// Tests for the type-ahead input driver

use bftty::host::{CapturedOutput, StreamHost};
use bftty::interpreter::driver::Driver;
use bftty::interpreter::engine::{Status, Step, VmState};
use bftty::interpreter::errors::RuntimeError;

const CAT: &str = ",[.,]";

#[test]
fn test_queued_input_is_consumed_in_order() {
    let mut driver = Driver::new(CAT, CapturedOutput::new()).unwrap();
    driver.feed(b"abc\0");
    assert_eq!(driver.pump(), Ok(Status::Halted));
    assert_eq!(driver.vm().host().text(), "abc");
    assert!(driver.pending().is_empty());
}

#[test]
fn test_pump_stops_when_queue_runs_dry() {
    let mut driver = Driver::new(CAT, CapturedOutput::new()).unwrap();
    driver.feed(b"xy");
    assert_eq!(driver.pump(), Ok(Status::AwaitingInput));
    assert_eq!(driver.vm().host().text(), "xy");

    assert_eq!(driver.deliver(b'z'), Ok(Some(Status::AwaitingInput)));
    assert_eq!(driver.deliver(0), Ok(Some(Status::Halted)));
    assert_eq!(driver.vm().host().text(), "xyz");
}

#[test]
fn test_deliver_before_start_queues() {
    let mut driver = Driver::new(",.", CapturedOutput::new()).unwrap();
    assert_eq!(driver.deliver(b'q'), Ok(None));
    assert_eq!(driver.pending().len(), 1);
    assert_eq!(driver.vm().state(), VmState::Ready);

    assert_eq!(driver.pump(), Ok(Status::Halted));
    assert_eq!(driver.vm().host().bytes(), b"q");
}

#[test]
fn test_retract_removes_last_byte() {
    let mut driver = Driver::new(",.", CapturedOutput::new()).unwrap();
    driver.feed(b"ab");
    assert_eq!(driver.retract(), Some(b'b'));
    assert_eq!(driver.pump(), Ok(Status::Halted));
    assert_eq!(driver.vm().host().bytes(), b"a");
}

#[test]
fn test_step_answers_input_from_queue() {
    let mut driver = Driver::new(",.", CapturedOutput::new()).unwrap();
    assert_eq!(driver.step(), Ok(Step::AwaitingInput));
    assert_eq!(driver.step(), Ok(Step::AwaitingInput));

    driver.feed(b"!");
    assert_eq!(driver.step(), Ok(Step::Continue));
    assert_eq!(driver.vm().program_counter(), 1);
    assert_eq!(driver.step(), Ok(Step::Halted));
    assert_eq!(driver.vm().host().bytes(), b"!");
}

#[test]
fn test_step_on_final_input_halts() {
    let mut driver = Driver::new("+,", CapturedOutput::new()).unwrap();
    driver.feed(b"k");
    assert_eq!(driver.step(), Ok(Step::Continue));
    assert_eq!(driver.step(), Ok(Step::Halted));
    assert_eq!(driver.vm().state(), VmState::Halted);
}

#[test]
fn test_fatal_error_propagates() {
    let mut driver = Driver::new(",<<", CapturedOutput::new()).unwrap();
    driver.feed(b"1");
    assert_eq!(driver.pump(), Err(RuntimeError::TapeUnderflow { pc: 1 }));
    assert_eq!(driver.vm().state(), VmState::Faulted);
}

#[test]
fn test_stream_host_receives_output() {
    let mut driver = Driver::new(",+.", StreamHost::new(Vec::new())).unwrap();
    driver.feed(b"a");
    assert_eq!(driver.pump(), Ok(Status::Halted));
    assert_eq!(driver.into_vm().into_host().into_inner(), b"b".to_vec());
}
