use chrono::{Duration, Utc};
use rand::Rng;

use crate::domain::{ChartData, ChartDataPoint, ChartRange, DashboardMetrics};

const REVENUE_BOUNDS: (f64, f64) = (1000.0, 5000.0);
const USERS_BOUNDS: (f64, f64) = (50.0, 200.0);
const ENGAGEMENT_BOUNDS: (f64, f64) = (60.0, 100.0);

/// Mock analytics. Values are random around fixed baselines; nothing is read
/// from storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    pub fn metrics(&self) -> DashboardMetrics {
        let mut rng = rand::thread_rng();
        DashboardMetrics {
            total_users: 1250 + rng.gen_range(0..100),
            revenue: 45678.50 + f64::from(rng.gen_range(0..10_000u32)),
            growth: 12.5 + f64::from(rng.gen_range(0..10u32)),
            active_users: 890 + rng.gen_range(0..50),
        }
    }

    pub fn charts(&self, range: ChartRange) -> ChartData {
        let days = range.days();
        ChartData {
            revenue: generate_series(days, REVENUE_BOUNDS),
            users: generate_series(days, USERS_BOUNDS),
            engagement: generate_series(days, ENGAGEMENT_BOUNDS),
        }
    }
}

/// One point per day ending today: midpoint, plus up to ±15% of the span as
/// noise, plus a rising trend worth half the span over the whole range.
fn generate_series(days: u32, (min, max): (f64, f64)) -> Vec<ChartDataPoint> {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let span = max - min;
    let base = min + span / 2.0;

    (0..days)
        .map(|i| {
            let date = today - Duration::days(i64::from(days - 1 - i));
            let variation = rng.gen_range(-0.5..0.5) * span * 0.3;
            let trend = f64::from(i) * span / f64::from(days) * 0.5;

            ChartDataPoint {
                date: date.format("%Y-%m-%d").to_string(),
                value: (base + variation + trend).clamp(min, max),
            }
        })
        .collect()
}
