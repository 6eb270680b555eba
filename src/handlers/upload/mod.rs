use crate::utils::{get_epoch_ts, get_random_num};

pub mod single;

/// Unique object key for an uploaded file, spaces replaced by underscores
fn uniq_file_name(file_name: &str) -> String {
    let ts = get_epoch_ts();
    let random = get_random_num(101, 999);
    let (name, ext) = file_name.rsplit_once('.').unwrap_or((file_name, "unknown"));
    let name = name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{name}_{ts}_{random}.{ext}")
}

/// Same name with a `.png` extension, used for watermarked uploads
fn png_file_name(file_name: &str) -> String {
    let name = file_name
        .rsplit_once('.')
        .map(|(name, _)| name)
        .unwrap_or(file_name);
    format!("{name}.png")
}
