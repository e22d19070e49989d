/*
 * @Description  : 数据集组装：
 *                 变换流水线 →（脑部/肺部）按文件夹提取标签 → 编码元数据 → 写清单
 *                 → 选取当前模式对应划分的标签 → 构造数据集 → 包装成 DataLoader。
 *                 标签在构造时计算一次并常驻内存，清单只是副产物，不会被读回。
 */

use std::collections::BTreeMap;

use tracing::info;

use crate::data::config::AssemblyConfig;
use crate::data::dataloader::DataLoader;
use crate::data::dataset::LabeledImageDataset;
use crate::data::error::{DataError, Result};
use crate::data::labels::{FolderLabelExtractor, LabelMap, LabelSource, MetadataEncoder, RecordMap};
use crate::data::manifest::ManifestWriter;
use crate::data::transforms::{AugmentationPipelineBuilder, Compose};
use crate::data::vocab::{DiseaseVocabulary, Split, validate_vocabularies};

/// 组装完成的数据集与加载器
#[derive(Debug)]
pub struct DatasetAssembly {
    config: AssemblyConfig,
    transform: Compose,
    labels: BTreeMap<Split, LabelMap>,
    records: BTreeMap<Split, RecordMap>,
    loader: DataLoader<LabeledImageDataset>,
}

impl DatasetAssembly {
    /// 按配置组装。只有脑部、肺部能按文件夹提取标签，其余器官请使用[`Self::build_with_source`]
    pub fn build(config: AssemblyConfig) -> Result<Self> {
        validate_vocabularies()?;
        config.validate()?;

        let organ = config.scanned_organ;
        let vocabulary = DiseaseVocabulary::for_organ(organ)
            .ok_or_else(|| DataError::MissingLabelSource(organ.to_string()))?;
        let extractor = FolderLabelExtractor::new(&config.dataset_path, vocabulary)?;

        let transform = Self::pipeline(&config)?;

        let encoder = MetadataEncoder::new(organ, config.scan_type, config.encoding);
        let writer = ManifestWriter::new(&config.csv_dest_folder, &config.csv_file_name);

        let mut labels = BTreeMap::new();
        let mut records = BTreeMap::new();
        for split in Split::ALL {
            let split_labels = extractor.labels(split)?;
            records.insert(split, encoder.encode(&split_labels, split)?);
            labels.insert(split, split_labels);
        }
        // 两个划分都提取成功后才写清单
        for (&split, split_records) in &records {
            writer.write(split_records, split)?;
        }

        Self::assemble(config, transform, labels, records)
    }

    /// 使用调用方提供的标签来源组装，不生成清单
    pub fn build_with_source(config: AssemblyConfig, source: &dyn LabelSource) -> Result<Self> {
        validate_vocabularies()?;
        config.validate()?;

        let transform = Self::pipeline(&config)?;
        let split = config.mode.split();
        let mut labels = BTreeMap::new();
        labels.insert(split, source.labels(split)?);
        info!(source = %source.describe(), "使用外部标签来源");

        Self::assemble(config, transform, labels, BTreeMap::new())
    }

    fn pipeline(config: &AssemblyConfig) -> Result<Compose> {
        AugmentationPipelineBuilder::new()
            .target_size(config.image_size)
            .build_for(config.scanned_organ, config.mode)
    }

    fn assemble(
        config: AssemblyConfig,
        transform: Compose,
        labels: BTreeMap<Split, LabelMap>,
        records: BTreeMap<Split, RecordMap>,
    ) -> Result<Self> {
        let split = config.mode.split();
        let empty = LabelMap::new();
        let split_labels = labels.get(&split).unwrap_or(&empty);

        let dataset = LabeledImageDataset::from_label_map(split_labels, Some(transform.clone()));
        let loader = DataLoader::new(dataset, config.batch_size)
            .shuffle(config.mode.is_train())
            .maybe_seed(config.seed);

        info!(
            organ = %config.scanned_organ,
            mode = config.mode.as_str(),
            %split,
            samples = loader.len(),
            batches = loader.num_batches(),
            "数据集组装完成"
        );

        Ok(Self {
            config,
            transform,
            labels,
            records,
            loader,
        })
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn transform(&self) -> &Compose {
        &self.transform
    }

    pub fn dataset(&self) -> &LabeledImageDataset {
        self.loader.dataset()
    }

    /// 某个划分在内存中的疾病标签
    pub fn labels(&self, split: Split) -> Option<&LabelMap> {
        self.labels.get(&split)
    }

    /// 某个划分在内存中的完整标签记录；使用外部标签来源时为空
    pub fn records(&self, split: Split) -> Option<&RecordMap> {
        self.records.get(&split)
    }

    pub fn loader(&self) -> &DataLoader<LabeledImageDataset> {
        &self.loader
    }

    /// 训练模式下打乱的加载器
    pub fn train_loader(&self) -> Option<&DataLoader<LabeledImageDataset>> {
        self.config.mode.is_train().then_some(&self.loader)
    }

    /// 验证、测试模式下不打乱的加载器
    pub fn val_loader(&self) -> Option<&DataLoader<LabeledImageDataset>> {
        (!self.config.mode.is_train()).then_some(&self.loader)
    }

    /// 清单写入位置（仅按文件夹提取标签时存在）
    pub fn manifest_paths(&self) -> Vec<std::path::PathBuf> {
        if self.records.is_empty() {
            return Vec::new();
        }
        let writer = ManifestWriter::new(&self.config.csv_dest_folder, &self.config.csv_file_name);
        Split::ALL.into_iter().map(|s| writer.path_for(s)).collect()
    }
}
