use crate::domain::model::Table;
use crate::domain::transform::{
    parse_request_date, ESTIMATED_COST, PAGES, REQUEST_DATE, SIZE_CATEGORY,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEPARTMENT: &str = "departamento";
const JOB_TYPE: &str = "tipo_trabajo";
const COPIES: &str = "cantidad_copias";
const PRODUCTION_HOURS: &str = "tiempo_produccion_horas";

/// Executive summary of a processed production table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub total_jobs: usize,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub departments: usize,
    pub job_types: Vec<String>,
    pub total_copies: f64,
    pub total_pages: f64,
    pub total_estimated_cost: f64,
    pub average_production_hours: Option<f64>,
    pub jobs_by_department: BTreeMap<String, usize>,
    pub jobs_by_size: BTreeMap<String, usize>,
}

impl ProductionSummary {
    pub fn from_table(table: &Table) -> Self {
        let mut summary = ProductionSummary {
            total_jobs: table.len(),
            ..Default::default()
        };

        let mut hours_total = 0.0;
        let mut hours_count = 0usize;

        for record in &table.records {
            if let Some(date) = record
                .get_str(REQUEST_DATE)
                .and_then(parse_request_date)
                .map(|dt| dt.date())
            {
                summary.period_start = Some(summary.period_start.map_or(date, |d| d.min(date)));
                summary.period_end = Some(summary.period_end.map_or(date, |d| d.max(date)));
            }

            if let Some(department) = record.get_str(DEPARTMENT) {
                *summary
                    .jobs_by_department
                    .entry(department.to_string())
                    .or_insert(0) += 1;
            }

            if let Some(job_type) = record.get_str(JOB_TYPE) {
                if !summary.job_types.iter().any(|t| t == job_type) {
                    summary.job_types.push(job_type.to_string());
                }
            }

            if let Some(size) = record.get_str(SIZE_CATEGORY) {
                *summary.jobs_by_size.entry(size.to_string()).or_insert(0) += 1;
            }

            summary.total_copies += record.get_f64(COPIES).unwrap_or(0.0);
            summary.total_pages += record.get_f64(PAGES).unwrap_or(0.0);
            summary.total_estimated_cost += record.get_f64(ESTIMATED_COST).unwrap_or(0.0);

            if let Some(hours) = record.get_f64(PRODUCTION_HOURS) {
                hours_total += hours;
                hours_count += 1;
            }
        }

        summary.departments = summary.jobs_by_department.len();
        if hours_count > 0 {
            summary.average_production_hours = Some(hours_total / hours_count as f64);
        }
        summary
    }

    /// Human readable lines for the CLI report.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("• Total de trabajos procesados: {}", self.total_jobs)];
        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            lines.push(format!("• Período cubierto: {} a {}", start, end));
        }
        lines.push(format!("• Departamentos atendidos: {}", self.departments));
        if !self.job_types.is_empty() {
            lines.push(format!("• Tipos de trabajo: {}", self.job_types.join(", ")));
        }
        lines.push(format!("• Copias totales: {}", self.total_copies));
        lines.push(format!("• Costo estimado total: ${:.2}", self.total_estimated_cost));
        if let Some(hours) = self.average_production_hours {
            lines.push(format!("• Tiempo medio de producción: {:.2} h", hours));
        }
        for (department, jobs) in &self.jobs_by_department {
            lines.push(format!("  - {}: {}", department, jobs));
        }
        lines
    }
}
