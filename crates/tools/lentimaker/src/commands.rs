//! Subcommand implementations

use crate::config::LentimakerConfig;
use crate::report::RigReport;
use anyhow::{bail, Context, Result};
use image::ImageFormat;
use indicatif::ProgressBar;
use lenticular::{
    compose_stereo_pair, compute_render_resolution, write_atomic, ColumnMapping, Interleaver,
    RenderResolution, RenderedImageSet,
};
use renderer::{run_to_completion, OfflineHost, RenderOrchestrator, RenderOutcome, StudioTracer};
use rig::Studio;
use std::path::{Path, PathBuf};

/// Studio with the configured main camera and a freshly built rig
pub fn build_studio(config: &LentimakerConfig) -> Result<Studio> {
    let mut studio = Studio::new(config.rig_settings()?);
    studio.set_main_camera(config.main_camera());
    studio.build().context("failed to build the camera rig")?;
    Ok(studio)
}

pub fn resolution(config: &LentimakerConfig) -> Result<RenderResolution> {
    Ok(compute_render_resolution(&config.print_settings()?))
}

pub fn rig_report(config: &LentimakerConfig) -> Result<RigReport> {
    let studio = build_studio(config)?;
    RigReport::from_studio(&studio).context("rig has no focus point")
}

/// Render every rig camera into the configured output directory
pub fn render(config: &LentimakerConfig, progress: &ProgressBar) -> Result<RenderOutcome> {
    let studio = build_studio(config)?;
    let (width, height) = config.frame_size()?;

    let main = config.main_camera();
    let mut host = OfflineHost::new(StudioTracer::default(), width, height).with_active_camera(main);
    let mut orchestrator = RenderOrchestrator::new(config.orchestrator_config());

    orchestrator
        .execute(&studio, &mut host)
        .context("cannot start rendering")?;
    tracing::info!(
        "Rendering {} cameras at {}x{} into {}",
        studio.rig_cameras().len(),
        width,
        height,
        config.render.output_dir.display()
    );

    progress.set_length(studio.rig_cameras().len() as u64);
    let outcome = run_to_completion(&mut orchestrator, &mut host, |orchestrator| {
        progress.set_position(orchestrator.progress().0 as u64);
    })?;
    progress.set_position(orchestrator.progress().0 as u64);
    progress.finish_and_clear();

    Ok(outcome)
}

/// Interleave the frames found in `dir` into `dir/lenticular.<ext>`.
///
/// Frames with a camera index at or above `views` are left over from a larger rig and
/// are skipped. `views` defaults to the configured camera count.
pub fn interleave(
    config: &LentimakerConfig,
    dir: &Path,
    mapping: ColumnMapping,
    width: Option<u32>,
    views: Option<usize>,
) -> Result<PathBuf> {
    let mut set = RenderedImageSet::discover(dir)
        .with_context(|| format!("no rendered set in {}", dir.display()))?;
    let views = views.unwrap_or(config.rig.camera_count);
    let discovered = set.len();
    set.retain_below(views);
    if set.len() < discovered {
        tracing::info!(
            "Skipping {} frames beyond the {}-camera rig in {}",
            discovered - set.len(),
            views,
            dir.display()
        );
    }
    let mut interleaver = Interleaver::from_print(&config.print_settings()?)?.with_mapping(mapping);
    if let Some(width) = width {
        interleaver = interleaver.with_width(width);
    }
    tracing::info!(
        "Interleaving {} views from {} ({} mapping)",
        set.len(),
        dir.display(),
        mapping
    );
    let path = interleaver
        .interleave_set(&set)
        .with_context(|| format!("failed to interleave {}", dir.display()))?;
    Ok(path)
}

pub fn stereo(left: &Path, right: &Path, output: &Path) -> Result<PathBuf> {
    let left_image =
        image::open(left).with_context(|| format!("failed to open {}", left.display()))?;
    let right_image =
        image::open(right).with_context(|| format!("failed to open {}", right.display()))?;
    let format = ImageFormat::from_path(output)
        .with_context(|| format!("unknown image format for {}", output.display()))?;

    let pair = compose_stereo_pair(&left_image, &right_image)?;
    write_atomic(&pair, output, format)?;
    tracing::info!("Wrote stereo pair {}", output.display());
    Ok(output.to_path_buf())
}

/// Render, then interleave the fresh frames
pub fn print(
    config: &LentimakerConfig,
    mapping: ColumnMapping,
    progress: &ProgressBar,
) -> Result<PathBuf> {
    match render(config, progress)? {
        RenderOutcome::Completed { rendered } => {
            tracing::info!("Rendered {} frames", rendered);
        }
        RenderOutcome::Cancelled {
            rendered,
            abandoned,
        } => bail!("rendering cancelled after {rendered} frames ({abandoned} abandoned)"),
        RenderOutcome::Failed { index, reason } => {
            bail!("rendering camera {index} failed: {reason}")
        }
    }
    interleave(
        config,
        &config.render.output_dir,
        mapping,
        None,
        None,
    )
}
