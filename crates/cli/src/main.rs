use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use triangulator::codec::{
    decode_point_set, decode_triangulation, encode_point_set, encode_triangulation,
};
use triangulator::rand::{draw_star_polygon, ReplayToken, StarCfg, VertexCount};
use triangulator::service::{parse_timeout_ms, ServiceCfg, Triangulator, CONTENT_TYPE_BINARY};
use triangulator::compute_triangulation;

mod provenance;

use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "triangulator-cli")]
#[command(about = "Ear-clipping triangulation of point sets", version)]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Triangulate a binary point-set file into a binary triangulation file
    Triangulate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Write the triangulation as JSON instead of the binary format
        #[arg(long)]
        json: bool,
    },
    /// Serve one `GET /triangulation/{id}` against a point-set directory
    Get {
        id: String,
        /// Point-set directory; overrides POINT_SET_STORE
        #[arg(long)]
        store: Option<PathBuf>,
        /// Compute deadline in milliseconds (0 = none); overrides TRIANGULATOR_COMPUTE_TIMEOUT_MS
        #[arg(long)]
        timeout_ms: Option<String>,
        /// Where to write a successful response body
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a random star-shaped polygon as a binary point set
    Generate {
        #[arg(long, default_value_t = 32)]
        vertices: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        clockwise: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Summarize a binary triangulation file
    Inspect { file: PathBuf },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Triangulate { input, out, json } => triangulate(&input, &out, json),
        Action::Get {
            id,
            store,
            timeout_ms,
            out,
        } => get(&id, store, timeout_ms.as_deref(), out.as_deref()),
        Action::Generate {
            vertices,
            seed,
            index,
            clockwise,
            out,
        } => generate(vertices, seed, index, clockwise, &out),
        Action::Inspect { file } => inspect(&file),
        Action::Report => report(),
    }
}

fn write_artifact(out: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))
}

fn triangulate(input: &Path, out: &Path, as_json: bool) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let points = decode_point_set(&bytes)
        .with_context(|| format!("decoding point set {}", input.display()))?;
    let tri = compute_triangulation(&points);
    tracing::info!(
        input = %input.display(),
        points = points.len(),
        vertices = tri.vertices.len(),
        triangles = tri.triangles.len(),
        complete = tri.is_complete(),
        "triangulate"
    );
    let encoded = if as_json {
        serde_json::to_vec_pretty(&tri)?
    } else {
        encode_triangulation(&tri.vertices, &tri.triangles)?
    };
    write_artifact(out, &encoded)?;
    let format = if as_json { "json" } else { "binary" };
    let prov = Provenance::new(
        "triangulate",
        json!({
            "input": input.display().to_string(),
            "format": format,
            "points": points.len(),
            "vertices": tri.vertices.len(),
            "triangles": tri.triangles.len(),
        }),
    );
    write_sidecar(out, prov)?;
    Ok(())
}

/// Environment configuration with command-line flags layered on top.
fn service_cfg(store: Option<PathBuf>, timeout_ms: Option<&str>) -> Result<ServiceCfg> {
    let mut cfg = ServiceCfg::from_env()?;
    if let Some(store) = store {
        cfg.store_root = store;
    }
    if let Some(raw) = timeout_ms {
        cfg.compute_timeout = parse_timeout_ms(raw)?;
    }
    Ok(cfg)
}

fn get(
    id: &str,
    store: Option<PathBuf>,
    timeout_ms: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let cfg = service_cfg(store, timeout_ms)?;
    tracing::info!(id, store = %cfg.store_root.display(), timeout = ?cfg.compute_timeout, "get");
    let svc = Triangulator::from_cfg(cfg);
    let resp = svc.handle("GET", &format!("/triangulation/{id}"));
    println!("{} {}", resp.status, resp.content_type);
    if resp.status != 200 {
        println!("{}", String::from_utf8_lossy(&resp.body));
        bail!("request failed with status {}", resp.status);
    }
    debug_assert_eq!(resp.content_type, CONTENT_TYPE_BINARY);
    match out {
        Some(out) => {
            write_artifact(out, &resp.body)?;
            let prov = Provenance::new(
                "get",
                json!({
                    "id": id,
                    "store": svc.cfg().store_root.display().to_string(),
                    "bytes": resp.body.len(),
                }),
            );
            write_sidecar(out, prov)?;
        }
        None => println!("{} bytes", resp.body.len()),
    }
    Ok(())
}

fn generate(vertices: usize, seed: u64, index: u64, clockwise: bool, out: &Path) -> Result<()> {
    let cfg = StarCfg {
        vertex_count: VertexCount::Fixed(vertices),
        clockwise,
        ..StarCfg::default()
    };
    let points = draw_star_polygon(cfg, ReplayToken { seed, index });
    tracing::info!(vertices = points.len(), seed, index, clockwise, "generate");
    write_artifact(out, &encode_point_set(&points)?)?;
    let prov = Provenance::new(
        "generate",
        json!({
            "vertices": points.len(),
            "seed": seed,
            "index": index,
            "clockwise": clockwise,
        }),
    );
    write_sidecar(out, prov)?;
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let tri = decode_triangulation(&bytes)
        .with_context(|| format!("decoding triangulation {}", file.display()))?;
    let summary = json!({
        "vertices": tri.vertices.len(),
        "triangles": tri.triangles.len(),
        "complete": tri.is_complete(),
        "triangle_area": tri.area(),
        "polygon_area": tri.polygon_area(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn report() -> Result<()> {
    let prov = Provenance::new("report", json!({}));
    println!("{}", serde_json::to_string_pretty(&prov)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use triangulator::{Point, Triangle};

    #[test]
    fn generate_then_triangulate_writes_artifacts() {
        let dir = tempdir().unwrap();
        let points = dir.path().join("in/star.bin");
        let tris = dir.path().join("out/star.tri");
        generate(12, 7, 0, true, &points).unwrap();
        triangulate(&points, &tris, false).unwrap();

        let tri = decode_triangulation(&std::fs::read(&tris).unwrap()).unwrap();
        assert_eq!(tri.vertices.len(), 12);
        assert_eq!(tri.triangles.len(), 10);
        assert!(dir.path().join("in/star.provenance.json").exists());
        assert!(dir.path().join("out/star.provenance.json").exists());
        inspect(&tris).unwrap();
    }

    #[test]
    fn get_reads_from_store_and_reports_failures() {
        let dir = tempdir().unwrap();
        let id = "123e4567-e89b-12d3-a456-426614174000";
        generate(5, 1, 1, false, &dir.path().join(format!("{id}.bin"))).unwrap();
        let out = dir.path().join("result.bin");
        let store = || Some(dir.path().to_path_buf());
        get(id, store(), Some("0"), Some(out.as_path())).unwrap();
        assert_eq!(decode_triangulation(&std::fs::read(&out).unwrap()).unwrap().triangles.len(), 3);

        assert!(get("not-an-id", store(), Some("0"), None).is_err());
        assert!(get(id, store(), Some("later"), None).is_err());
    }

    #[test]
    fn flags_override_environment_config() {
        let cfg = service_cfg(Some(PathBuf::from("/srv/sets")), Some("250")).unwrap();
        assert_eq!(cfg.store_root, PathBuf::from("/srv/sets"));
        assert_eq!(cfg.compute_timeout, Some(std::time::Duration::from_millis(250)));
        assert_eq!(
            service_cfg(Some(PathBuf::from("/srv/sets")), Some("0")).unwrap().compute_timeout,
            None
        );

        // Without flags the environment layer is used as is.
        assert_eq!(service_cfg(None, None).unwrap(), ServiceCfg::from_env().unwrap());
    }

    #[test]
    fn inspect_rejects_out_of_range_indices() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.tri");
        let bytes = encode_triangulation(
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
            &[Triangle::new(0, 1, 3)],
        )
        .unwrap();
        std::fs::write(&file, bytes).unwrap();
        let err = inspect(&file).unwrap_err();
        assert!(format!("{err:#}").contains("references vertex 3"));
    }

    #[test]
    fn triangulate_rejects_corrupt_input() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.bin");
        std::fs::write(&bad, [0u8, 0, 0, 5, 1]).unwrap();
        let err = triangulate(&bad, &dir.path().join("x.bin"), false).unwrap_err();
        assert!(format!("{err:#}").contains("decoding point set"));
    }
}
