use clap::Parser;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tinydet::{
    AnchorTable, BoundingBox, Decoder, Infer, LabelTable, ModelConfig, NmsConfig, NmsGrouping,
    Pipeline, PipelineSettings, TensorLayout,
};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "tinydet CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the decode and suppress stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TensorFormat {
    #[default]
    F32Le,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum GroupingConfig {
    Global,
    PerClass,
}

impl From<GroupingConfig> for NmsGrouping {
    fn from(value: GroupingConfig) -> Self {
        match value {
            GroupingConfig::Global => NmsGrouping::Global,
            GroupingConfig::PerClass => NmsGrouping::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayoutConfig {
    CellMajor,
    ChannelMajor,
}

impl From<LayoutConfig> for TensorLayout {
    fn from(value: LayoutConfig) -> Self {
        match value {
            LayoutConfig::CellMajor => TensorLayout::CellMajor,
            LayoutConfig::ChannelMajor => TensorLayout::ChannelMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NmsConfigJson {
    max_results: usize,
    iou_threshold: f32,
    grouping: GroupingConfig,
}

impl Default for NmsConfigJson {
    fn default() -> Self {
        let cfg = NmsConfig::default();
        Self {
            max_results: cfg.max_results,
            iou_threshold: cfg.iou_threshold,
            grouping: GroupingConfig::Global,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ModelConfigJson {
    grid_size: usize,
    input_size: usize,
    num_anchors: usize,
    num_classes: usize,
    anchors: Vec<[f32; 2]>,
    labels: Vec<String>,
    layout: LayoutConfig,
}

impl Default for ModelConfigJson {
    fn default() -> Self {
        let cfg = ModelConfig::default();
        Self {
            grid_size: cfg.grid_size,
            input_size: cfg.input_size,
            num_anchors: cfg.num_anchors,
            num_classes: cfg.num_classes,
            anchors: cfg
                .anchors
                .iter()
                .map(|anchor| [anchor.width, anchor.height])
                .collect(),
            labels: cfg.labels.to_vec(),
            layout: LayoutConfig::CellMajor,
        }
    }
}

impl From<ModelConfigJson> for ModelConfig {
    fn from(value: ModelConfigJson) -> Self {
        let pairs: Vec<(f32, f32)> = value.anchors.iter().map(|[w, h]| (*w, *h)).collect();
        ModelConfig {
            grid_size: value.grid_size,
            input_size: value.input_size,
            num_anchors: value.num_anchors,
            num_classes: value.num_classes,
            anchors: AnchorTable::from_pairs(&pairs),
            labels: LabelTable::new(value.labels),
            layout: value.layout.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SurfaceJson {
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    tensor_paths: Vec<String>,
    tensor_format: TensorFormat,
    output_path: Option<String>,
    confidence_threshold: f32,
    nms: NmsConfigJson,
    model: ModelConfigJson,
    surface: Option<SurfaceJson>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tensor_paths: Vec::new(),
            tensor_format: TensorFormat::F32Le,
            output_path: None,
            confidence_threshold: PipelineSettings::default().confidence_threshold,
            nms: NmsConfigJson::default(),
            model: ModelConfigJson::default(),
            surface: None,
        }
    }
}

/// Stands in for the inference runtime by loading precomputed output tensors.
struct TensorFileEngine {
    format: TensorFormat,
}

impl Infer for TensorFileEngine {
    type Image = Path;
    type Error = Box<dyn Error + Send + Sync>;

    fn infer(&self, path: &Path) -> Result<Vec<f32>, Self::Error> {
        match self.format {
            TensorFormat::F32Le => {
                let bytes = fs::read(path)?;
                if bytes.len() % 4 != 0 {
                    return Err(format!(
                        "{}: {} bytes is not a whole number of f32 values",
                        path.display(),
                        bytes.len()
                    )
                    .into());
                }
                Ok(bytes
                    .chunks_exact(4)
                    .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .collect())
            }
            TensorFormat::Json => {
                let text = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    label: String,
    class_index: usize,
    confidence: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl From<BoundingBox> for DetectionRecord {
    fn from(value: BoundingBox) -> Self {
        Self {
            label: value.label,
            class_index: value.class_index,
            confidence: value.confidence,
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    path: String,
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    frames: Vec<FrameRecord>,
}

/// Maps boxes from the model input onto the render surface and drops those left outside it.
fn fit_to_surface(
    boxes: Vec<BoundingBox>,
    input_size: usize,
    surface: Option<&SurfaceJson>,
) -> Vec<BoundingBox> {
    let Some(surface) = surface else {
        return boxes;
    };
    let sx = surface.width / input_size as f32;
    let sy = surface.height / input_size as f32;
    boxes
        .iter()
        .filter_map(|b| b.scaled(sx, sy).clipped(surface.width, surface.height))
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tinydet=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_paths.is_empty() {
        return Err("tensor_paths must list at least one tensor file".into());
    }
    if let Some(surface) = &config.surface {
        if !(surface.width > 0.0 && surface.height > 0.0) {
            return Err("surface width and height must be positive".into());
        }
    }

    let decoder = Decoder::new(config.model.into())?;
    let input_size = decoder.config().input_size;
    let settings = PipelineSettings {
        confidence_threshold: config.confidence_threshold,
        nms: NmsConfig {
            max_results: config.nms.max_results,
            iou_threshold: config.nms.iou_threshold,
            grouping: config.nms.grouping.into(),
        },
    };
    let engine = TensorFileEngine {
        format: config.tensor_format,
    };
    let pipeline = Pipeline::new(engine, decoder).with_settings(settings);

    let mut frames = Vec::with_capacity(config.tensor_paths.len());
    for path in &config.tensor_paths {
        // Frames are handled one at a time, so the slot is always free here.
        let mut cycle = pipeline
            .try_begin()
            .ok_or("pipeline slot unexpectedly busy")?;
        let boxes = cycle.run(Path::new(path))?;
        let boxes = fit_to_surface(boxes, input_size, config.surface.as_ref());
        tracing::info!(path = %path, detections = boxes.len(), "frame decoded");
        frames.push(FrameRecord {
            path: path.clone(),
            detections: boxes.into_iter().map(DetectionRecord::from).collect(),
        });
    }

    let output = Output { frames };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
