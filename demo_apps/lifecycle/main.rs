//! Resource lifecycle walkthrough.
//!
//! Creates a buffer, an image and a sampler on the simulated runtime, shares
//! and leases them, provokes the misuse errors the registry guards against and
//! shuts the context down.
//!
//! Run with: `RUST_LOG=debug cargo run -p lifecycle`

use std::sync::Arc;

use anyhow::{Context, bail};
use devres::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = Arc::new(SimulatedRuntime::new());
    let config = RegistryConfig::default()
        .with_tombstones(TombstonePolicy::Retain)
        .with_label_prefix("demo/");
    let ctx = DeviceContext::new(Arc::clone(&runtime), config);

    // --- Creation ---------------------------------------------------------
    let buffer = ctx
        .create_buffer(&BufferDesc::new(64 * 1024), Some("staging"))
        .context("creating staging buffer")?;
    let image = ctx
        .create_image(&ImageDesc::new_2d(ImageFormat::default(), 512, 256), None)
        .context("creating albedo image")?;
    let sampler = ctx
        .create_sampler(&SamplerDesc::default(), None)
        .context("creating sampler")?;

    log::info!("Created {} entries", ctx.registry().len());

    // --- Queries ------------------------------------------------------------
    {
        let lease = ctx.lease(image)?;
        let width = lease.query(ImageInfo::Width)?;
        let pitch = lease.query(ImageInfo::RowPitch)?;
        log::info!(
            "Image {} is {width:?} wide, row pitch {pitch:?}",
            lease.handle()?
        );
    }
    let filter = ctx.query(sampler, SamplerInfo::FilterMode)?;
    log::info!("Sampler filter: {filter:?}");

    // --- Sharing ------------------------------------------------------------
    ctx.retain(buffer)?;
    ctx.release(buffer)?;
    log::info!(
        "Buffer references after retain + release: {}",
        ctx.registry().ref_count(buffer)?
    );
    ctx.release(buffer)?;
    log::info!("Buffer native releases: {}", runtime.total_releases());

    // --- Misuse ---------------------------------------------------------------
    match ctx.release(buffer) {
        Err(err @ RegistryError::UnderRelease(_)) => log::info!("Rejected: {err}"),
        other => bail!("expected an under-release error, got {other:?}"),
    }
    match ctx.retain(buffer) {
        Err(err @ RegistryError::AlreadyReleased(_)) => log::info!("Rejected: {err}"),
        other => bail!("expected an already-released error, got {other:?}"),
    }

    // --- Force close with an outstanding holder -------------------------------
    let lease = ctx.lease(sampler)?;
    ctx.force_close(sampler)?;
    if let Err(err) = lease.handle() {
        log::info!("Lease after force close: {err}");
    }
    drop(lease);

    // --- Shutdown ---------------------------------------------------------------
    let report = ctx.shutdown();
    log::info!(
        "Shutdown: released {}, already released {}, outstanding references {}",
        report.released,
        report.already_released,
        report.outstanding_references
    );

    if !runtime.double_frees().is_empty() || runtime.live_objects() != 0 {
        bail!(
            "runtime reports {} double free(s) and {} live object(s)",
            runtime.double_frees().len(),
            runtime.live_objects()
        );
    }
    log::info!(
        "Done: {} acquires, {} releases, no double frees",
        runtime.total_acquires(),
        runtime.total_releases()
    );
    Ok(())
}
