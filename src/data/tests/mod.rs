mod dataloader;
mod dataset;
mod extractor;

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

/// 在`root/<split>/<tag>/`下写入`count`张`size × size`的灰度 PNG，返回写入的路径
pub(super) fn write_images(
    root: &Path,
    split: &str,
    tag: &str,
    count: usize,
    size: u32,
) -> Vec<PathBuf> {
    let dir = root.join(split).join(tag);
    fs::create_dir_all(&dir).unwrap();
    (0..count)
        .map(|i| {
            let path = dir.join(format!("{tag}_{i}.png"));
            GrayImage::from_fn(size, size, |x, y| Luma([((x + y) * 8 + i as u32) as u8]))
                .save(&path)
                .unwrap();
            path
        })
        .collect()
}

/// 脑部数据集：train 下 2 张 glioma，test 下 1 张 notumor
pub(super) fn brain_dataset(root: &Path, size: u32) {
    write_images(root, "Training", "glioma", 2, size);
    write_images(root, "Testing", "notumor", 1, size);
}
