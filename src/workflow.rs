use crate::config::SelectorConfig;
use crate::constraints::{CompatibilityEvaluator, DriveConstraints};
use crate::drive::{Drive, StatusKind};
use crate::enumerator::{DeviceEnumerator, LsblkEnumerator};
use crate::flow::{DriveSelectorFlow, FlowOutcome, FlowResult};
use crate::gate::CompatibilityGate;
use crate::{cli, tui, utils};
use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

// Initial drive list for the selector. An unavailable enumerator shows up as "no drives".
fn list_initial_drives<D: DeviceEnumerator + ?Sized>(enumerator: &D) -> Vec<Drive> {
    match enumerator.list_available_drives() {
        Ok(drives) => drives,
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    }
}

// Maps --preselect device paths onto enumerated drives; unknown devices are reported and skipped.
fn resolve_preselected(devices: &[String], available: &[Drive]) -> Vec<Drive> {
    devices
        .iter()
        .filter_map(|device| match available.iter().find(|d| &d.device == device) {
            Some(drive) => Some(drive.clone()),
            None => {
                eprintln!("⚠️ Warning: --preselect {}: no such drive", device);
                None
            }
        })
        .collect()
}

// Renders the available drives with their compatibility labels, one per line.
pub fn format_drive_listing<E: CompatibilityEvaluator>(flow: &DriveSelectorFlow<E>) -> String {
    if !flow.has_available_drives() {
        return "Connect a drive!\nNo removable drive connected.\n".to_string();
    }
    let mut out = String::new();
    for drive in flow.available_drives() {
        let tick = if flow.selection().contains(&drive.device) {
            "[x]"
        } else if flow.is_valid(drive) {
            "[ ]"
        } else {
            "[-]"
        };
        let labels: Vec<String> = flow
            .statuses_for(drive)
            .iter()
            .map(|s| match s.kind {
                StatusKind::Error => format!(" <{}>", s.message),
                StatusKind::Warning | StatusKind::Ok => format!(" ({})", s.message),
            })
            .collect();
        out.push_str(&format!(
            "{} {} - {}  {}{}\n",
            tick,
            drive.description,
            utils::bytes_to_closest_unit(drive.size),
            drive.device,
            labels.concat()
        ));
    }
    out
}

fn report_result(result: &FlowResult, as_json: bool) -> Result<()> {
    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).context("failed to serialize result")?
        );
        return Ok(());
    }
    match result.outcome {
        FlowOutcome::Done => {
            println!("✅ Selected {} drive(s):", result.drives.len());
            for drive in &result.drives {
                println!("  {}", drive.tooltip());
            }
        }
        FlowOutcome::Cancel => println!("Selection cancelled. Exiting."),
    }
    Ok(())
}

// Main orchestrator for drivepick.
pub fn run_drivepick(cli_args: cli::Cli) -> Result<()> {
    // Step 1: Configuration and image.
    let config = SelectorConfig::from_cli(&cli_args)?;
    let image = config.load_image()?;
    if let Some(image) = &image {
        info!(
            "image {} ({})",
            image.path.display(),
            utils::bytes_to_closest_unit(image.size)
        );
    }

    // Step 2: Collaborators, injected into the flow.
    let enumerator = Arc::new(LsblkEnumerator::new(config.show_all_drives));
    let gate = CompatibilityGate::new(
        DriveConstraints::new(config.large_drive_threshold),
        config.unknown_verdict,
    );
    info!("drives without a verdict: {:?}", gate.policy());
    let initial = list_initial_drives(enumerator.as_ref());
    let seed = resolve_preselected(&config.preselect, &initial);
    let flow = DriveSelectorFlow::new(gate, image, initial).with_selection(seed.clone());

    for rejected in seed.iter().filter(|d| !flow.selection().contains(&d.device)) {
        eprintln!(
            "⚠️ Warning: {} cannot be selected for this image: {}",
            rejected.device,
            flow.statuses_for(rejected)
                .iter()
                .map(|s| s.message.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    // Step 3: Headless listing or the interactive selector.
    let result = if cli_args.headless {
        if !cli_args.json {
            print!("{}", format_drive_listing(&flow));
            if flow.shows_warning_notice() {
                println!(
                    "WARNING: You have chosen one or more drives with warning label. Proceed with caution!"
                );
            }
        }
        flow.on_confirm()
    } else {
        tui::run_drive_selector(flow, enumerator, config.poll_interval)?
    };

    // Step 4: Hand the outcome to the caller.
    report_result(&result, cli_args.json)
}
