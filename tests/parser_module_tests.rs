use perf_timeline_import::importer::import_trace;
use perf_timeline_import::model::TimelineEntity;
use perf_timeline_import::utils::error::ImportErrorKind;
use pretty_assertions::assert_eq;

const SCHED_TRACE: &str = "\
# tracer: nop
#
#           TASK-PID    CPU#    TIMESTAMP  FUNCTION
          <idle>-0     [000]  10.000000: sched_wakeup: comm=app pid=300 prio=120 success=1 target_cpu=000
          <idle>-0     [000]  10.002000: sched_switch: prev_comm=swapper prev_pid=0 prev_prio=120 prev_state=R ==> next_comm=app next_pid=300 next_prio=120
             app-300   [000]  10.010000: sched_switch: prev_comm=app prev_pid=300 prev_prio=120 prev_state=S ==> next_comm=swapper next_pid=0 next_prio=120
          <idle>-0     [001]  10.005000: sched_switch: prev_comm=swapper prev_pid=0 prev_prio=120 prev_state=R ==> next_comm=daemon next_pid=77 next_prio=100
          <idle>-0     [001]  10.020000: sched_wakeup: comm=late pid=88 prio=120 success=1 target_cpu=001
";

#[test]
fn test_sched_switch_builds_cpu_slices() {
    let result = import_trace(SCHED_TRACE).unwrap();
    assert!(result.is_clean(), "unexpected errors: {:?}", result.errors);

    let cpu0 = result.model.cpu(0).unwrap();
    assert_eq!(cpu0.slices().len(), 1);
    let slice = &cpu0.slices()[0];
    assert_eq!(slice.title, "app");
    assert!((slice.start - 10002.0).abs() < 1e-6);
    assert!((slice.duration.unwrap() - 8.0).abs() < 1e-6);
    assert_eq!(slice.args.get("wakeup_latency_ms").map(String::as_str), Some("2.000"));
    assert!(cpu0.running().is_none());

    // still running at end of trace, closed at the last timestamp
    let cpu1 = result.model.cpu(1).unwrap();
    let daemon = &cpu1.slices()[0];
    assert_eq!(daemon.title, "daemon");
    assert!((daemon.end().unwrap() - 10020.0).abs() < 1e-6);
}

#[test]
fn test_sched_events_create_threads() {
    let mut result = import_trace(SCHED_TRACE).unwrap();

    let pids: Vec<u32> = result.model.processes().map(|p| p.pid()).collect();
    assert_eq!(pids, vec![77, 88, 300]);

    let app = result.model.process(300).unwrap();
    assert_eq!(app.thread_count(), 1);
    let thread = app.thread(300).unwrap();
    assert_eq!(thread.name(), Some("app"));
    assert_eq!(thread.open_slice_count(), 0);

    // idle task never becomes a process
    assert!(result.model.process(0).is_none());

    // the woken thread keeps the first name it was seen with
    let late = result.model.process_mut(88).unwrap();
    late.get_or_create_thread(88).set_name_if_missing("renamed");
    assert_eq!(late.thread(88).unwrap().name(), Some("late"));
}

#[test]
fn test_repeated_wakeup_is_a_diagnostic() {
    let text = "\
  <idle>-0 [000] 1.000000: sched_wakeup: comm=app pid=5 prio=120 success=1 target_cpu=000
  <idle>-0 [000] 1.100000: sched_wakeup: comm=app pid=5 prio=120 success=1 target_cpu=000
";
    let result = import_trace(text).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ImportErrorKind::HandlerDiagnostic);
    assert_eq!(result.errors[0].line, Some(2));

    let diagnostics: Vec<_> = result.errors_of(ImportErrorKind::HandlerDiagnostic).collect();
    assert!(diagnostics[0].message.contains("thread 5 (app)"));
}

#[test]
fn test_bad_sched_switch_body_is_rejected() {
    let text = "  app-1 [000] 1.000000: sched_switch: nonsense\n";
    let result = import_trace(text).unwrap();
    assert_eq!(result.error_count(ImportErrorKind::HandlerRejected), 1);
}

#[test]
fn test_workqueue_slices_on_owning_process() {
    let text = "\
  kworker/0:1-12 (10) [000] d..3 1.000000: workqueue_execute_start: work struct c4ee9a44: function vmstat_update
  kworker/0:1-12 (10) [000] d..3 1.004000: workqueue_execute_end: work struct c4ee9a44
  kworker/0:2-13 (10) [000] d..3 1.010000: workqueue_execute_start: work struct c4ee9a50: function flush_to_ldisc
  kworker/1:0-20 [001] d..3 1.020000: workqueue_execute_start: work struct c4ee9a60: function gc_worker
";
    let result = import_trace(text).unwrap();
    assert!(result.is_clean(), "unexpected errors: {:?}", result.errors);

    let pids: Vec<u32> = result.model.processes().map(|p| p.pid()).collect();
    assert_eq!(pids, vec![10, 20]);

    let process = result.model.process(10).unwrap();
    assert_eq!(process.thread_count(), 2);
    assert_eq!(process.user_friendly_details(), "pid: 10");

    let thread = process.thread(12).unwrap();
    assert_eq!(thread.name(), Some("kworker/0:1"));
    let slice = &thread.slices()[0];
    assert_eq!(slice.title, "vmstat_update");
    assert_eq!(slice.args.get("work_struct").map(String::as_str), Some("c4ee9a44"));
    assert!((slice.duration.unwrap() - 4.0).abs() < 1e-6);

    // unfinished work is closed at the end of the trace
    let unfinished = &process.thread(13).unwrap().slices()[0];
    assert!((unfinished.end().unwrap() - 1020.0).abs() < 1e-6);
}

#[test]
fn test_workqueue_end_without_start_is_diagnostic_only() {
    let text = "  kworker/0:1-12 [000] d..3 1.000000: workqueue_execute_end: work struct c4ee9a44\n";
    let result = import_trace(text).unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ImportErrorKind::HandlerDiagnostic);
}

#[test]
fn test_clock_sync_marker() {
    let text = "  chrome-1234 [000] ...1 12.500000: tracing_mark_write: trace_event_clock_sync: parent_ts=12.6\n";
    let result = import_trace(text).unwrap();

    assert!(result.is_clean());
    let offset = result.model.clock_sync_offset().unwrap();
    assert!((offset - 100.0).abs() < 1e-6);
}

#[test]
fn test_unknown_marker_tag_is_unrecognized() {
    let text = "  chrome-1234 [000] ...1 12.500000: tracing_mark_write: other_tag: hello\n";
    let result = import_trace(text).unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ImportErrorKind::UnrecognizedEventType);
    assert_eq!(
        result.errors[0].event_name.as_deref(),
        Some("tracing_mark_write:other_tag")
    );
}

#[test]
fn test_clock_sync_without_parent_ts_is_rejected() {
    let text = "  chrome-1234 [000] ...1 12.500000: tracing_mark_write: trace_event_clock_sync: nothing\n";
    let result = import_trace(text).unwrap();
    assert_eq!(result.error_count(ImportErrorKind::HandlerRejected), 1);
    assert_eq!(result.model.clock_sync_offset(), None);
}
