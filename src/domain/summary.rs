//! 时长与大小汇总

use super::content::AudioTrack;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 总时长（秒），跳过时长未知的轨道
pub fn total_duration<'a>(tracks: impl IntoIterator<Item = &'a AudioTrack>) -> f64 {
    tracks
        .into_iter()
        .filter_map(|track| track.duration_secs())
        .sum()
}

/// 总大小（字节）
pub fn total_size<'a>(tracks: impl IntoIterator<Item = &'a AudioTrack>) -> u64 {
    tracks.into_iter().map(|track| track.size_bytes()).sum()
}

/// 人类可读的大小：按 1024 逐级换算
///
/// 字节数按整数显示（"0 B"），更大单位保留两位小数（"1.50 KB"）。
pub fn humanize_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, SIZE_UNITS[0])
    } else {
        format!("{:.2} {}", value, SIZE_UNITS[unit])
    }
}

/// 解析时长字符串："ss"、"mm:ss" 或 "hh:mm:ss"（秒可带小数）
///
/// 无法解析时返回 None。
pub fn parse_duration(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let (last, leading) = parts.split_last()?;
    let seconds: f64 = last.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    if !leading.is_empty() && seconds >= 60.0 {
        return None;
    }

    let mut total = seconds;
    for (position, part) in leading.iter().rev().enumerate() {
        let value: u64 = part.trim().parse().ok()?;
        // 分钟位在有小时位时必须小于 60
        if position == 0 && leading.len() == 2 && value >= 60 {
            return None;
        }
        total += value as f64 * 60f64.powi(position as i32 + 1);
    }

    Some(total)
}

/// 格式化时长："mm:ss"，超过一小时为 "hh:mm:ss"
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
