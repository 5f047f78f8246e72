use clap::Parser;
use edgesketch::io::{load_gray_image, save_gray_image};
use edgesketch::{
    finalize, sketch_with_par, AdaptiveRegionDispatcher, BlockClass, ClassifyThresholds,
    DispatchConfig, DogConfig, Filter, GaborConfig, GaussianConfig, PhaseCongruencyConfig,
    ScaleSpaceConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "EdgeSketch CLI (JSON config driven)")]
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
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Adaptive,
    Filter,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AdaptiveConfigJson {
    block_size: usize,
    smooth_max_variance: f64,
    smooth_max_edge_density: f64,
    smooth_max_gradient: f64,
    detail_min_gradient: f64,
    detail_min_variance: f64,
    flow_min_edge_density: f64,
}

impl Default for AdaptiveConfigJson {
    fn default() -> Self {
        let cfg = DispatchConfig::default();
        let t = cfg.thresholds;
        Self {
            block_size: cfg.block_size,
            smooth_max_variance: t.smooth_max_variance,
            smooth_max_edge_density: t.smooth_max_edge_density,
            smooth_max_gradient: t.smooth_max_gradient,
            detail_min_gradient: t.detail_min_gradient,
            detail_min_variance: t.detail_min_variance,
            flow_min_edge_density: t.flow_min_edge_density,
        }
    }
}

impl AdaptiveConfigJson {
    fn dispatch_config(&self, parallel: bool) -> DispatchConfig {
        DispatchConfig {
            block_size: self.block_size,
            thresholds: ClassifyThresholds {
                smooth_max_variance: self.smooth_max_variance,
                smooth_max_edge_density: self.smooth_max_edge_density,
                smooth_max_gradient: self.smooth_max_gradient,
                detail_min_gradient: self.detail_min_gradient,
                detail_min_variance: self.detail_min_variance,
                flow_min_edge_density: self.flow_min_edge_density,
            },
            parallel,
        }
    }
}

/// Parameters substituted wherever the matching algorithm appears.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ParamsJson {
    gaussian_sigma: f64,
    dog_sigma1: f64,
    dog_sigma2: f64,
    gabor_theta: f64,
    gabor_lambda: f64,
    gabor_sigma: f64,
    gabor_gamma: f64,
    pc_orientations: usize,
    pc_scales: usize,
    scale_space_initial_sigma: f64,
    scale_space_scales: usize,
    scale_space_step: f64,
}

impl Default for ParamsJson {
    fn default() -> Self {
        let gaussian = GaussianConfig::default();
        let dog = DogConfig::default();
        let gabor = GaborConfig::default();
        let pc = PhaseCongruencyConfig::default();
        let ss = ScaleSpaceConfig::default();
        Self {
            gaussian_sigma: gaussian.sigma,
            dog_sigma1: dog.sigma1,
            dog_sigma2: dog.sigma2,
            gabor_theta: gabor.theta,
            gabor_lambda: gabor.lambda,
            gabor_sigma: gabor.sigma,
            gabor_gamma: gabor.gamma,
            pc_orientations: pc.num_orientations,
            pc_scales: pc.num_scales,
            scale_space_initial_sigma: ss.initial_sigma,
            scale_space_scales: ss.scales,
            scale_space_step: ss.scale_step,
        }
    }
}

impl ParamsJson {
    fn bind(&self, filter: Filter) -> Filter {
        match filter {
            Filter::GaussianBlur(_) => Filter::GaussianBlur(GaussianConfig {
                sigma: self.gaussian_sigma,
            }),
            Filter::Dog(_) => Filter::Dog(DogConfig {
                sigma1: self.dog_sigma1,
                sigma2: self.dog_sigma2,
            }),
            Filter::Gabor(_) => Filter::Gabor(GaborConfig {
                theta: self.gabor_theta,
                lambda: self.gabor_lambda,
                sigma: self.gabor_sigma,
                gamma: self.gabor_gamma,
            }),
            Filter::PhaseCongruency(_) => Filter::PhaseCongruency(PhaseCongruencyConfig {
                num_orientations: self.pc_orientations,
                num_scales: self.pc_scales,
            }),
            Filter::ScaleSpace(_) => Filter::ScaleSpace(ScaleSpaceConfig {
                initial_sigma: self.scale_space_initial_sigma,
                scales: self.scale_space_scales,
                scale_step: self.scale_space_step,
            }),
            Filter::Combine(members) => {
                Filter::Combine(members.into_iter().map(|m| self.bind(m)).collect())
            }
            other => other,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    output_path: String,
    report_path: Option<String>,
    mode: ModeConfig,
    filter: String,
    parallel: bool,
    adaptive: AdaptiveConfigJson,
    params: ParamsJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: String::new(),
            report_path: None,
            mode: ModeConfig::Adaptive,
            filter: "sobel".to_string(),
            parallel: false,
            adaptive: AdaptiveConfigJson::default(),
            params: ParamsJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    width: usize,
    height: usize,
    mode: ModeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    blocks: BTreeMap<&'static str, usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("edgesketch=info".parse()?),
            )
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
    if config.input_path.is_empty() || config.output_path.is_empty() {
        return Err("input_path and output_path must be set in the config".into());
    }

    let raster = load_gray_image(&config.input_path)?;
    let (width, height) = raster.dimensions();

    let (sketch, report) = match config.mode {
        ModeConfig::Adaptive => {
            let dispatcher = AdaptiveRegionDispatcher::new()
                .with_config(config.adaptive.dispatch_config(config.parallel));
            let mut rules = dispatcher.plan(&raster)?;
            let mut blocks: BTreeMap<&'static str, usize> =
                BlockClass::ALL.iter().map(|class| (class.name(), 0)).collect();
            for rule in &mut rules {
                if let Some(class) = rule.class {
                    *blocks.entry(class.name()).or_default() += 1;
                }
                rule.filter = config.params.bind(rule.filter.clone());
            }
            let edges = dispatcher.execute(&raster, &rules)?;
            let report = Report {
                width,
                height,
                mode: config.mode,
                filter: None,
                blocks,
            };
            (finalize(&edges)?, report)
        }
        ModeConfig::Filter => {
            let filter = config.params.bind(Filter::from_name(&config.filter)?);
            filter.validate()?;
            let sketch = sketch_with_par(&raster, &filter, config.parallel)?;
            let report = Report {
                width,
                height,
                mode: config.mode,
                filter: Some(filter.to_string()),
                blocks: BTreeMap::new(),
            };
            (sketch, report)
        }
    };

    save_gray_image(&sketch, &config.output_path)?;

    let json = serde_json::to_string_pretty(&report)?;
    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
