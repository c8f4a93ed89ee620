use drivepick::constraints::CompatibilityEvaluator;
use drivepick::drive::{CompatibilityStatus, Drive, Image};
use drivepick::enumerator::DeviceEnumerator;
use drivepick::error::SelectorError;
use drivepick::flow::{DriveSelectorFlow, FlowOutcome};
use drivepick::gate::{CompatibilityGate, ContinueAffordance, VerdictPolicy};
use drivepick::poller::DrivePoller;
use drivepick::selection::Selection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

struct FixedEvaluator {
    statuses: HashMap<String, Vec<CompatibilityStatus>>,
}

impl CompatibilityEvaluator for FixedEvaluator {
    fn statuses_for(
        &self,
        drive: &Drive,
        _image: Option<&Image>,
    ) -> Result<Vec<CompatibilityStatus>, SelectorError> {
        Ok(self.statuses.get(&drive.device).cloned().unwrap_or_default())
    }
}

fn drive(device: &str) -> Drive {
    Drive::new(device, format!("Drive {}", device), device, 32_000_000_000)
}

fn flow_with(
    drives: &[Drive],
    statuses: Vec<(&str, CompatibilityStatus)>,
) -> DriveSelectorFlow<FixedEvaluator> {
    let mut table: HashMap<String, Vec<CompatibilityStatus>> = HashMap::new();
    for (device, status) in statuses {
        table.entry(device.to_string()).or_default().push(status);
    }
    let gate = CompatibilityGate::new(FixedEvaluator { statuses: table }, VerdictPolicy::Permissive);
    DriveSelectorFlow::new(gate, None, drives.to_vec())
}

#[test]
fn toggle_scenarios() {
    let (x, y, z) = (drive("/dev/x"), drive("/dev/y"), drive("/dev/z"));
    let mut flow = flow_with(
        &[x.clone(), y.clone(), z.clone()],
        vec![
            ("/dev/y", CompatibilityStatus::error("Too small")),
            ("/dev/z", CompatibilityStatus::warning("Large drive")),
        ],
    );

    flow.on_toggle(&x);
    assert_eq!(flow.selection().drives(), &[x.clone()]);
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Ready);

    flow.on_toggle(&x);
    assert!(flow.selection().is_empty());
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Blocked);

    flow.on_toggle(&y);
    assert!(flow.selection().is_empty());

    flow.on_toggle(&z);
    assert_eq!(flow.selection().drives(), &[z.clone()]);
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Caution);

    let result = flow.on_confirm();
    assert_eq!(result.outcome, FlowOutcome::Done);
    assert_eq!(result.drives, vec![z]);
}

fn device_set(selection: &Selection) -> Vec<String> {
    let mut devices: Vec<String> = selection.drives().iter().map(|d| d.device.clone()).collect();
    devices.sort();
    devices
}

#[test]
fn selection_properties_hold_for_all_toggle_sequences() {
    let drives: Vec<Drive> = ["/dev/a", "/dev/b", "/dev/c"].iter().map(|d| drive(d)).collect();
    let verdicts = [true, false];

    // Every sequence of four toggles over three drives and both verdicts.
    let choices: Vec<(usize, bool)> = (0..drives.len())
        .flat_map(|i| verdicts.iter().map(move |&v| (i, v)))
        .collect();
    let sequences: Vec<Vec<(usize, bool)>> = (0..choices.len().pow(4))
        .map(|mut n| {
            (0..4)
                .map(|_| {
                    let choice = choices[n % choices.len()];
                    n /= choices.len();
                    choice
                })
                .collect()
        })
        .collect();

    for seq in &sequences {
        let mut selection = Selection::new();
        for &(idx, valid) in seq {
            let before = selection.clone();
            selection = selection.toggle(&drives[idx], valid);
            if !valid {
                assert_eq!(selection, before);
            }
            // Toggling twice with the same verdict is the identity. Re-adding a
            // removed drive appends it, so only membership is compared then.
            let round_trip = selection.toggle(&drives[idx], valid).toggle(&drives[idx], valid);
            if selection.contains(&drives[idx].device) {
                assert_eq!(device_set(&round_trip), device_set(&selection));
            } else {
                assert_eq!(round_trip, selection);
            }
        }
        let mut devices: Vec<&str> = selection.drives().iter().map(|d| d.device.as_str()).collect();
        let total = devices.len();
        devices.sort();
        devices.dedup();
        assert_eq!(devices.len(), total);
        assert_eq!(selection.summary().count, selection.len());
    }
}

#[test]
fn continue_state_matches_selection_and_statuses() {
    let (a, b) = (drive("/dev/a"), drive("/dev/b"));
    let mut flow = flow_with(
        &[a.clone(), b.clone()],
        vec![("/dev/b", CompatibilityStatus::warning("System Drive"))],
    );
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Blocked);
    flow.on_toggle(&a);
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Ready);
    flow.on_toggle(&b);
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Caution);
    flow.on_toggle(&b);
    assert_eq!(flow.continue_affordance(), ContinueAffordance::Ready);
}

/// Returns each scripted list once, then repeats the last one. Counts calls.
struct ScriptedEnumerator {
    script: Mutex<Vec<Vec<Drive>>>,
    calls: AtomicUsize,
}

impl ScriptedEnumerator {
    fn new(script: Vec<Vec<Drive>>) -> Self {
        ScriptedEnumerator {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }
}

impl DeviceEnumerator for ScriptedEnumerator {
    fn list_available_drives(&self) -> Result<Vec<Drive>, SelectorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.remove(0))
        } else {
            Ok(script[0].clone())
        }
    }
}

#[test]
fn poller_emits_exactly_one_update_for_one_change() {
    let (a, b, c) = (drive("/dev/a"), drive("/dev/b"), drive("/dev/c"));
    let enumerator = Arc::new(ScriptedEnumerator::new(vec![
        vec![a.clone(), b.clone()],
        vec![a.clone(), b.clone()],
        vec![a.clone(), c.clone()],
    ]));
    // Tick 1 is the view's initial fetch.
    let initial = enumerator.list_available_drives().unwrap();

    let poller = DrivePoller::start(enumerator.clone(), initial, Duration::from_millis(5)).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while enumerator.calls.load(Ordering::SeqCst) < 6 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    // Every tick so far has queued its update, if it had one.
    let mut updates = Vec::new();
    while let Some(update) = poller.try_next() {
        updates.push(update);
    }
    poller.stop();
    assert_eq!(updates, vec![vec![a, c]]);
}

#[test]
fn flow_applies_polled_updates_and_stops_after_teardown() {
    let (a, b) = (drive("/dev/a"), drive("/dev/b"));
    let enumerator = Arc::new(ScriptedEnumerator::new(vec![vec![a.clone()], vec![a.clone(), b.clone()]]));
    let mut flow = flow_with(&[a.clone()], Vec::new());
    flow.on_toggle(&a);

    let poller =
        DrivePoller::start(enumerator.clone(), flow.available_drives().to_vec(), Duration::from_millis(5))
            .unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut applied = 0;
    while applied == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
        if let Some(drives) = poller.try_next() {
            flow.on_drives_changed(drives);
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(flow.available_drives(), &[a.clone(), b]);
    assert_eq!(flow.selection().drives(), &[a]);

    poller.stop();
    let calls = enumerator.calls.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(enumerator.calls.load(Ordering::SeqCst), calls);
}
