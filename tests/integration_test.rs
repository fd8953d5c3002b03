// Integration tests for the Brainfuck VM

use bftty::host::{CapturedOutput, Host};
use bftty::interpreter::engine::{Status, Vm, VmState};
use bftty::interpreter::errors::{RuntimeError, StructuralError};

fn run(source: &str) -> (Result<Status, RuntimeError>, CapturedOutput) {
    let mut vm = Vm::new(source, CapturedOutput::new()).expect("Program should be valid");
    let result = vm.run();
    (result, vm.into_host())
}

#[test]
fn test_balanced_programs_are_accepted() {
    for source in ["", "[]", "[[]]", "[][]", "+[->[-]<]", "comment [ with ] text"] {
        assert!(
            Vm::new(source, CapturedOutput::new()).is_ok(),
            "Rejected valid program {:?}",
            source
        );
    }
}

#[test]
fn test_unbalanced_programs_are_rejected() {
    let cases = [
        ("]", StructuralError::UnmatchedClose { position: 0 }),
        ("[", StructuralError::UnclosedOpen { position: 0 }),
        ("[]]", StructuralError::UnmatchedClose { position: 2 }),
        ("][", StructuralError::UnmatchedClose { position: 0 }),
        ("+[[-]", StructuralError::UnclosedOpen { position: 1 }),
    ];

    for (source, expected) in cases {
        let err = Vm::new(source, CapturedOutput::new())
            .err()
            .unwrap_or_else(|| panic!("Accepted invalid program {:?}", source));
        assert_eq!(err, expected, "Wrong error for {:?}", source);
    }
}

#[test]
fn test_rejected_program_never_executes() {
    let mut host = CapturedOutput::new();
    assert!(Vm::new("+.]", &mut host).is_err());
    assert!(host.bytes().is_empty());
}

#[test]
fn test_nested_multiplication_prints_64() {
    let (result, output) = run("++++++++[>++++++++<-]>.");
    assert_eq!(result, Ok(Status::Halted));
    assert_eq!(output.bytes(), &[64]);
    assert_eq!(output.text(), "@");
}

#[test]
fn test_hello_world() {
    let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    let (result, output) = run(source);
    assert_eq!(result, Ok(Status::Halted));
    assert_eq!(output.text(), "Hello World!\n");
}

#[test]
fn test_increment_wraps_at_256() {
    let source = format!("{}.", "+".repeat(256));
    let (_, output) = run(&source);
    assert_eq!(output.bytes(), &[0]);

    let source = format!("+{}.", "+".repeat(256));
    let (_, output) = run(&source);
    assert_eq!(output.bytes(), &[1]);
}

#[test]
fn test_decrement_wraps_below_zero() {
    let (_, output) = run("-.");
    assert_eq!(output.bytes(), &[255]);

    let source = format!("{}.", "-".repeat(256));
    let (_, output) = run(&source);
    assert_eq!(output.bytes(), &[0]);
}

#[test]
fn test_underflow_stops_execution() {
    let (result, output) = run("+.<.");
    assert_eq!(result, Err(RuntimeError::TapeUnderflow { pc: 2 }));
    // The '.' after the failing move never runs
    assert_eq!(output.bytes(), &[1]);
}

#[test]
fn test_overflow_at_tape_end() {
    // 29,999 moves reach the last cell; one more fails
    let source = format!("{}+.>.", ">".repeat(29_999));
    let (result, output) = run(&source);
    assert_eq!(result, Err(RuntimeError::TapeOverflow { pc: 30_001 }));
    assert_eq!(output.bytes(), &[1]);
}

#[test]
fn test_faulted_vm_refuses_to_continue() {
    let mut vm = Vm::new("<", CapturedOutput::new()).unwrap();
    assert!(vm.run().unwrap_err().is_fatal());
    assert_eq!(vm.state(), VmState::Faulted);
    assert_eq!(vm.run(), Err(RuntimeError::Faulted));
    assert_eq!(vm.step(), Err(RuntimeError::Faulted));
}

#[test]
fn test_input_then_echo() {
    let mut vm = Vm::new(",.", CapturedOutput::new()).unwrap();

    assert_eq!(vm.run(), Ok(Status::AwaitingInput));
    assert_eq!(vm.state(), VmState::AwaitingInput);
    assert!(vm.host().bytes().is_empty());
    assert!(vm.host().is_waiting());

    assert_eq!(vm.resume(65), Ok(Status::Halted));
    assert_eq!(vm.host().bytes(), b"A");
    assert!(!vm.host().is_waiting());
    assert_eq!(vm.state(), VmState::Halted);
}

#[test]
fn test_double_resume_is_rejected() {
    let mut vm = Vm::new(",.", CapturedOutput::new()).unwrap();
    vm.run().unwrap();
    vm.resume(b'x').unwrap();

    assert_eq!(
        vm.resume(b'y'),
        Err(RuntimeError::NotAwaitingInput {
            state: VmState::Halted
        })
    );
    assert_eq!(vm.host().bytes(), b"x");
}

#[test]
fn test_resume_before_run_is_rejected() {
    let mut vm = Vm::new(",", CapturedOutput::new()).unwrap();
    assert_eq!(
        vm.resume(1),
        Err(RuntimeError::NotAwaitingInput {
            state: VmState::Ready
        })
    );
    assert_eq!(vm.run(), Ok(Status::AwaitingInput));
}

#[test]
fn test_multiple_suspensions() {
    // Read three bytes, print them in reverse
    let mut vm = Vm::new(",>,>,.<.<.", CapturedOutput::new()).unwrap();
    assert_eq!(vm.run(), Ok(Status::AwaitingInput));
    assert_eq!(vm.resume(b'a'), Ok(Status::AwaitingInput));
    assert_eq!(vm.resume(b'b'), Ok(Status::AwaitingInput));
    assert_eq!(vm.resume(b'c'), Ok(Status::Halted));
    assert_eq!(vm.host().text(), "cba");
    assert_eq!(vm.host().input_requests(), 3);
}

#[test]
fn test_input_inside_loop() {
    // Echo until a zero byte arrives
    let mut vm = Vm::new(",[.,]", CapturedOutput::new()).unwrap();
    let mut status = vm.run().unwrap();
    for &b in b"ok\0" {
        assert_eq!(status, Status::AwaitingInput);
        status = vm.resume(b).unwrap();
    }
    assert_eq!(status, Status::Halted);
    assert_eq!(vm.host().text(), "ok");
}

/// Host that records the order of every callback
#[derive(Default)]
struct EventLog(Vec<String>);

impl Host for EventLog {
    fn output(&mut self, byte: u8) {
        self.0.push(format!("out {}", byte));
    }

    fn input_requested(&mut self) {
        self.0.push("request".to_string());
    }

    fn input_satisfied(&mut self) {
        self.0.push("satisfied".to_string());
    }
}

#[test]
fn test_host_callback_order() {
    let mut vm = Vm::new("+.,.", EventLog::default()).unwrap();
    vm.run().unwrap();
    vm.resume(7).unwrap();
    assert_eq!(
        vm.into_host().0,
        vec!["out 1", "request", "satisfied", "out 7"]
    );
}

#[test]
fn test_halted_run_is_idempotent() {
    let mut vm = Vm::new("+.", CapturedOutput::new()).unwrap();
    assert_eq!(vm.run(), Ok(Status::Halted));
    assert_eq!(vm.run(), Ok(Status::Halted));
    assert_eq!(vm.host().bytes(), &[1]);
}
