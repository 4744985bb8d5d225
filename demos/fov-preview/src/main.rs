//! FOV 裁剪预览.
//!
//! 构造一个水柱模体, 按演示几何推导有效 FOV 半径, 对 HU 体数据做圆形裁剪,
//! 再把叠加了 FOV 圆的中间切片放大后保存为 PNG.
//!
//! 用法: `fov-preview [bicubic|linear|nearest]`, 缺省 linear.

use ct_grape::prelude::*;
use image::{GrayImage, Luma};
use log::info;
use ndarray::{Array3, ArrayView2, Axis};
use std::path::Path;

/// 演示几何: 射线源到旋转中心距离 (mm).
const SOD: f64 = 750.0;

/// 演示几何: 射线源到探测器距离 (mm).
const SDD: f64 = 1250.0;

/// 演示几何: 探测器总宽度 (mm).
const DET_WIDTH: f64 = 400.0;

/// 演示几何: 重建像素尺寸 (mm).
const PIX_SIZE: f64 = 1.0;

fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "linear".to_string());
    let interp: Interp = arg.parse().expect("未知的插值方式");

    let radius = fov_crop_radius(SOD, SDD, DET_WIDTH, PIX_SIZE).unwrap();
    info!("有效 FOV 半径: {radius:.3} px");
    let radius = radius.floor() as usize;

    let mu_vol = water_phantom();
    let hu_vol = mu_to_hu(
        mu_vol.view(),
        hu::MU_WATER_REF_MM as f32,
        hu::SCALE as f32,
    )
    .unwrap();
    let cropped = fov_crop(hu_vol.view(), radius, hu::AIR as f32).unwrap();
    info!("圆形裁剪完成, 体数据形状: {:?}", cropped.dim());

    let coronal = permute(cropped.view(), Direction::Transverse, Direction::Coronal);
    info!("冠状位重切片形状: {:?}", coronal.dim());

    let mid = cropped.index_axis(Axis(0), cropped.len_of(Axis(0)) / 2);
    let enlarged = resize(mid, ResizeTo::Scale(2.0, 2.0), interp).unwrap();
    info!("中间切片经 {arg} 插值放大到 {:?}", enlarged.dim());

    let mut preview = to_gray(enlarged.view());
    overlay_circle(&mut preview, radius * 2);
    let out = Path::new("fov_preview.png");
    preview.save(out).expect("PNG 写入失败");
    info!("预览图已写入 {}", out.display());
}

/// 均匀水柱模体 (线性衰减系数图), 圆柱半径 100 px.
fn water_phantom() -> Array3<f32> {
    let mu_water = hu::MU_WATER_REF_MM as f32;
    Array3::from_shape_fn((16, 256, 256), |(_, h, w)| {
        let x = h as f64 - 127.5;
        let y = w as f64 - 127.5;
        if x * x + y * y <= 100.0 * 100.0 {
            mu_water
        } else {
            0.0
        }
    })
}

/// 按 [-1000, 1000] HU 窗线性映射到 8 bit 灰度.
fn to_gray(img: ArrayView2<'_, f32>) -> GrayImage {
    let (h, w) = img.dim();
    let mut gray = GrayImage::new(w as u32, h as u32);
    for ((y, x), &v) in img.indexed_iter() {
        let t = ((v as f64 - hu::AIR) / (hu::SCALE - hu::AIR)).clamp(0.0, 1.0);
        gray.put_pixel(x as u32, y as u32, Luma([(t * 255.0) as u8]));
    }
    gray
}

/// 在预览图上描出 FOV 圆.
fn overlay_circle(gray: &mut GrayImage, radius: usize) {
    let shape = (gray.height() as usize, gray.width() as usize);
    for (x, y) in draw_circle(shape, radius, None).unwrap() {
        let (row, col) = (x.round() as i64, y.round() as i64);
        if (0..gray.height() as i64).contains(&row) && (0..gray.width() as i64).contains(&col) {
            gray.put_pixel(col as u32, row as u32, Luma([u8::MAX]));
        }
    }
}
