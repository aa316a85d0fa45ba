use std::time::{Duration, Instant};

use prettytable::{cell, row, Table};

/// Frame timing collected over the lifetime of the window
#[derive(Clone, Debug)]
pub struct FrameStats {
    start: Instant,
    frames: u64,
    frame_time: Duration,
    slowest: Duration,
}

impl FrameStats {
    pub fn new() -> FrameStats {
        FrameStats {
            start: Instant::now(),
            frames: 0,
            frame_time: Duration::default(),
            slowest: Duration::default(),
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.frames += 1;
        self.frame_time += dt;
        self.slowest = self.slowest.max(dt);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn average_frame(&self) -> Option<Duration> {
        if self.frames == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(
            self.frame_time.as_secs_f64() / self.frames as f64,
        ))
    }

    pub fn fps(&self) -> Option<f64> {
        self.average_frame()
            .filter(|avg| *avg > Duration::default())
            .map(|avg| 1.0 / avg.as_secs_f64())
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Frames", self.frames()]);
        table.add_row(row!["Elapsed", format!("{:#.2?}", self.start.elapsed())]);
        match (self.average_frame(), self.fps()) {
            (Some(avg), Some(fps)) => {
                table.add_row(row!["Frame time", format!("{:#.2?}", avg)]);
                table.add_row(row!["Slowest", format!("{:#.2?}", self.slowest)]);
                table.add_row(row!["FPS", format!("{:.1}", fps)]);
            }
            _ => {
                table.add_row(row!["FPS", "-"]);
            }
        }
        table
    }

    pub fn print(&self) {
        self.table().printstd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_have_no_rate() {
        let stats = FrameStats::new();
        assert_eq!(stats.average_frame(), None);
        assert_eq!(stats.fps(), None);
        assert_eq!(stats.table().len(), 3);
    }

    #[test]
    fn averages_recorded_frames() {
        let mut stats = FrameStats::new();
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(30));
        assert_eq!(stats.frames(), 2);
        let avg = stats.average_frame().unwrap();
        assert!((avg.as_secs_f64() - 0.02).abs() < 1e-9);
        let fps = stats.fps().unwrap();
        assert!((fps - 50.0).abs() < 1e-9);
        assert_eq!(stats.table().len(), 5);
    }

    #[test]
    fn average_survives_frame_counts_past_u32() {
        let frames = u64::from(u32::MAX) + 1;
        let stats = FrameStats {
            frames,
            frame_time: Duration::from_secs(frames),
            ..FrameStats::new()
        };
        let avg = stats.average_frame().unwrap();
        assert!((avg.as_secs_f64() - 1.0).abs() < 1e-6);
        assert!((stats.fps().unwrap() - 1.0).abs() < 1e-6);
    }
}
