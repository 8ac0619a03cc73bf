use log::{LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;
use systolic_dispatch::{multiply, Dims, ReferenceExecutor};

struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool { true }

    fn log(&self, record: &Record<'_>) {
        if record.target().starts_with("systolic_dispatch::dispatch") {
            self.lines.lock().unwrap().push(format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture { lines: Mutex::new(Vec::new()) };

// Single test: the logger is process-global.
#[test]
fn dispatch_traces_entry_before_validating_and_dimensions_after() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut exec = ReferenceExecutor::new();
    let mut out = [0i8; 6];
    multiply(&mut exec, 1, false, Dims::new(2, 3, 4), &[1; 8], &[1; 12], &mut out, 2, None).unwrap();
    assert_eq!(out, [2; 6]);
    {
        let lines = CAPTURE.lines.lock().unwrap();
        assert_eq!(
            *lines,
            vec![
                "Called into systolic matmul!".to_string(),
                "Using accelerated matmul with dimensions (2, 3, 4)".to_string(),
            ]
        );
    }

    CAPTURE.lines.lock().unwrap().clear();
    assert!(multiply(&mut exec, 1, false, Dims::new(2, 3, 4), &[1; 8], &[1; 12], &mut out, 3, None).is_err());
    assert_eq!(*CAPTURE.lines.lock().unwrap(), vec!["Called into systolic matmul!".to_string()]);
}
