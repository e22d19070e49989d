//! 命令行入口：为按文件夹组织的医学影像数据集生成 CSV 标签清单，并报告组装结果
//!
//! ```text
//! scan_manifest --config brain.json
//! scan_manifest --dataset-path data/brain --organ brain --scan-type rmn \
//!     --csv-dest-folder out --csv-file-name brain.csv --mode train
//! ```
//!
//! 日志级别由`RUST_LOG`控制，默认为`info`。

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use scan_dataset::data::{AssemblyConfig, DatasetAssembly, Encoding, Mode, Organ, ScanType, Split};

#[derive(Debug, Parser)]
#[command(name = "scan_manifest", about = "生成医学影像标签清单并组装数据集")]
struct Args {
    /// JSON 配置文件；给定时其余参数作为覆盖项
    #[arg(long)]
    config: Option<PathBuf>,

    /// 数据集根目录（其下应有 train/test 文件夹）
    #[arg(long)]
    dataset_path: Option<PathBuf>,

    /// 器官：brain、lungs、breast
    #[arg(long)]
    organ: Option<Organ>,

    /// 扫描类型：rmn/mri、xray、ct
    #[arg(long)]
    scan_type: Option<ScanType>,

    /// 清单输出目录
    #[arg(long)]
    csv_dest_folder: Option<PathBuf>,

    /// 清单文件名
    #[arg(long)]
    csv_file_name: Option<String>,

    /// 模式：train、val、test
    #[arg(long)]
    mode: Option<Mode>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// 标签编码：plain、one_hot
    #[arg(long)]
    encoding: Option<Encoding>,

    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<AssemblyConfig> {
        let mut config = match &self.config {
            Some(path) => AssemblyConfig::from_json_file(path)
                .with_context(|| format!("读取配置文件 {} 失败", path.display()))?,
            None => {
                let (
                    Some(dataset_path),
                    Some(organ),
                    Some(scan_type),
                    Some(csv_dest_folder),
                    Some(csv_file_name),
                ) = (
                    &self.dataset_path,
                    self.organ,
                    self.scan_type,
                    &self.csv_dest_folder,
                    &self.csv_file_name,
                )
                else {
                    bail!(
                        "未提供 --config 时必须给出 --dataset-path、--organ、--scan-type、--csv-dest-folder、--csv-file-name"
                    );
                };
                AssemblyConfig::new(dataset_path, organ, scan_type, csv_dest_folder, csv_file_name)
            }
        };

        if let Some(dataset_path) = self.dataset_path {
            config.dataset_path = dataset_path;
        }
        if let Some(organ) = self.organ {
            config.scanned_organ = organ;
        }
        if let Some(scan_type) = self.scan_type {
            config.scan_type = scan_type;
        }
        if let Some(csv_dest_folder) = self.csv_dest_folder {
            config.csv_dest_folder = csv_dest_folder;
        }
        if let Some(csv_file_name) = self.csv_file_name {
            config.csv_file_name = csv_file_name;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("初始化日志失败")?;

    let config = Args::parse().into_config()?;
    let assembly = DatasetAssembly::build(config).context("组装数据集失败")?;

    for split in Split::ALL {
        if let Some(records) = assembly.records(split) {
            info!(%split, images = records.len(), "标签记录");
        }
    }
    for path in assembly.manifest_paths() {
        println!("清单: {}", path.display());
    }
    println!(
        "{} 模式：{} 张图像，batch_size = {}，共 {} 个批次",
        assembly.config().mode.as_str(),
        assembly.loader().len(),
        assembly.loader().batch_size(),
        assembly.loader().num_batches()
    );
    Ok(())
}
