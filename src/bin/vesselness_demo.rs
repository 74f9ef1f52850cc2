use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use vesselness::config::demo::{self, DemoConfig};
use vesselness::diagnostics::{FrameReport, PipelineTrace};
use vesselness::image::io::{save_grayscale_f32, save_mask, save_rgb_image, write_json_file};
use vesselness::image::ImageRgba;
use vesselness::segmentation::{overlay, segment, Approval};
use vesselness::{StageView, VesselnessFilter};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport<'a> {
    trace: &'a PipelineTrace,
    #[serde(skip_serializing_if = "Option::is_none")]
    segmentation: Option<SegmentationSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentationSummary {
    threshold: f32,
    coverage: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval: Option<Approval>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "vesselness_demo".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| usage(&program))?;
    let config = demo::load_config(&config_path)?;

    let input = config.input.load()?;
    let mut filter = VesselnessFilter::new(input.w, input.h, config.options)
        .map_err(|e| format!("Failed to build filter: {e}"))?;
    let report = filter
        .process_with_diagnostics(&input, &config.params)
        .map_err(|e| format!("Vesselness failed: {e}"))?;

    print_text_summary(&report);

    let segmentation = run_segmentation(&config, &input, &report)?;

    if let Some(path) = &config.output.color_image {
        save_rgb_image(&filter.colorize(config.params.mode), path)?;
        println!("Colour map written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        let out = DemoReport {
            trace: &report.trace,
            segmentation,
        };
        write_json_file(path, &out)?;
        println!("JSON report written to {}", path.display());
    }
    if let Some(dir) = &config.output.debug_dir {
        save_stage_previews(dir, &filter)?;
        println!("Stage previews written to {}", dir.display());
    }
    Ok(())
}

fn run_segmentation(
    config: &DemoConfig,
    input: &ImageRgba,
    report: &FrameReport,
) -> Result<Option<SegmentationSummary>, String> {
    let Some(seg) = &config.segmentation else {
        return Ok(None);
    };
    let mask = segment(&report.vesselness, seg.threshold);
    let coverage = mask.data.iter().filter(|&&m| m).count() as f32 / mask.data.len().max(1) as f32;
    println!("Segmentation: threshold={:.4} coverage={:.4}", seg.threshold, coverage);

    let approval = seg.approval.map(|window| window.evaluate(&mask));
    if let Some(a) = &approval {
        println!(
            "  approval window: ratio={:.3} approved={}",
            a.ratio, a.approved
        );
    }
    if let Some(path) = &config.output.mask_image {
        save_mask(&mask, path)?;
    }
    if let Some(path) = &config.output.overlay_image {
        let out = overlay(input, &mask).map_err(|e| format!("Overlay failed: {e}"))?;
        save_rgb_image(&out, path)?;
    }
    Ok(Some(SegmentationSummary {
        threshold: seg.threshold,
        coverage,
        approval,
    }))
}

fn print_text_summary(report: &FrameReport) {
    let trace = &report.trace;
    println!("Vesselness summary");
    println!("  {}", trace.summary_line());
    println!("\nTimings (ms):");
    for stage in &trace.timings.stages {
        println!("  {:<12} {:.3}", stage.label, stage.elapsed_ms);
    }
}

fn save_stage_previews(dir: &Path, filter: &VesselnessFilter) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;
    let ws = filter.workspace();
    for view in StageView::ALL {
        let path = dir.join(format!("{}.png", view.label()));
        save_grayscale_f32(&ws.preview(view), &path)?;
    }
    Ok(())
}
