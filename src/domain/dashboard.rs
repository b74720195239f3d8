#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_users: u32,
    pub revenue: f64,
    pub growth: f64,
    pub active_users: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub revenue: Vec<ChartDataPoint>,
    pub users: Vec<ChartDataPoint>,
    pub engagement: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartRange {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl ChartRange {
    /// Unknown or missing values fall back to a week.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("30d") => ChartRange::Month,
            Some("90d") => ChartRange::Quarter,
            Some("1y") => ChartRange::Year,
            _ => ChartRange::Week,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            ChartRange::Week => 7,
            ChartRange::Month => 30,
            ChartRange::Quarter => 90,
            ChartRange::Year => 365,
        }
    }
}
