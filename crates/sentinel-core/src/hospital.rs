use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: &'static str,
    pub note: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InflowDay {
    pub day: &'static str,
    pub patients: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    River,
    Road,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    pub name: &'static str,
    pub status: &'static str,
    pub beds_free: u32,
    pub travel_minutes: u32,
    pub route: Route,
}

impl Facility {
    pub const fn is_full(&self) -> bool {
        self.beds_free == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyLine {
    pub item: &'static str,
    pub stock: u64,
    pub outlook: &'static str,
    pub status: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HospitalSnapshot {
    pub kpis: Vec<Kpi>,
    pub inflow: Vec<InflowDay>,
    pub facilities: Vec<Facility>,
    pub inventory: Vec<SupplyLine>,
    pub recommendation: &'static str,
}

impl HospitalSnapshot {
    pub fn sample() -> Self {
        Self {
            kpis: vec![
                Kpi {
                    label: "Active Patients",
                    value: "1,284",
                    note: "+12% vs last week",
                    severity: Severity::Warning,
                },
                Kpi {
                    label: "Bed Capacity",
                    value: "88%",
                    note: "Critical",
                    severity: Severity::Critical,
                },
                Kpi {
                    label: "Avg Wait Time",
                    value: "14m",
                    note: "-2m since morning",
                    severity: Severity::Normal,
                },
                Kpi {
                    label: "Risk Level",
                    value: "High",
                    note: "Dengue Surge Warning Active",
                    severity: Severity::Critical,
                },
            ],
            inflow: vec![
                InflowDay { day: "MON", patients: 980 },
                InflowDay { day: "TUE", patients: 1_060 },
                InflowDay { day: "WED", patients: 1_240 },
                InflowDay { day: "THU", patients: 1_450 },
                InflowDay { day: "FRI", patients: 1_310 },
                InflowDay { day: "SAT", patients: 1_120 },
                InflowDay { day: "SUN", patients: 1_020 },
            ],
            facilities: vec![
                Facility {
                    name: "Can Tho General",
                    status: "Stable",
                    beds_free: 42,
                    travel_minutes: 12,
                    route: Route::River,
                },
                Facility {
                    name: "Vinh Long Medical",
                    status: "Crowded",
                    beds_free: 8,
                    travel_minutes: 24,
                    route: Route::Road,
                },
                Facility {
                    name: "O Mon District Clinic",
                    status: "At Capacity",
                    beds_free: 0,
                    travel_minutes: 35,
                    route: Route::River,
                },
            ],
            inventory: vec![
                SupplyLine {
                    item: "Saline Solution (L)",
                    stock: 420,
                    outlook: "-280 shortfall in 72h",
                    status: "Urgent Order",
                    severity: Severity::Critical,
                },
                SupplyLine {
                    item: "Mosquito Nets",
                    stock: 1_100,
                    outlook: "+200 safe margin",
                    status: "Well Stocked",
                    severity: Severity::Normal,
                },
                SupplyLine {
                    item: "Blood Packs (O+)",
                    stock: 15,
                    outlook: "4 days coverage",
                    status: "Monitoring",
                    severity: Severity::Warning,
                },
                SupplyLine {
                    item: "Oral Rehydration",
                    stock: 3_500,
                    outlook: "14 days coverage",
                    status: "Well Stocked",
                    severity: Severity::Normal,
                },
            ],
            recommendation: "Predicted peak on Thursday. Recommend shifting 2 ICU staff \
                             from Ward B to Emergency tonight.",
        }
    }

    pub fn peak(&self) -> Option<&InflowDay> {
        self.inflow.iter().max_by_key(|day| day.patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_peaks_on_thursday() {
        let snapshot = HospitalSnapshot::sample();
        assert_eq!(snapshot.inflow.len(), 7);
        let peak = snapshot.peak().map(|day| (day.day, day.patients));
        assert_eq!(peak, Some(("THU", 1_450)));
    }

    #[test]
    fn only_o_mon_is_full() {
        let snapshot = HospitalSnapshot::sample();
        let full: Vec<_> = snapshot
            .facilities
            .iter()
            .filter(|f| f.is_full())
            .map(|f| f.name)
            .collect();
        assert_eq!(full, vec!["O Mon District Clinic"]);
    }
}
