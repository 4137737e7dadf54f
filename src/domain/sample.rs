//! Simulated production data, used when no input file is available.

use crate::domain::model::{Record, Table};
use crate::utils::error::{EtlError, Result};
use chrono::{Duration, NaiveDate};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Exp;
use serde_json::Value;

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

pub const DEPARTMENTS: [&str; 6] = [
    "Filosofía",
    "Letras",
    "Historia",
    "Antropología",
    "Biblioteca",
    "Administración",
];
pub const JOB_TYPES: [&str; 6] = [
    "Libro",
    "Cuadernillo",
    "Folleto",
    "Tesis",
    "Certificado",
    "Diploma",
];
pub const PRIORITIES: [&str; 3] = ["Alta", "Media", "Baja"];
const PRIORITY_WEIGHTS: [f64; 3] = [0.2, 0.5, 0.3];
pub const STATES: [&str; 4] = ["Pendiente", "En Proceso", "Completado", "Entregado"];
pub const MATERIALS: [&str; 5] = [
    "Papel A4",
    "Papel A3",
    "Cartulina",
    "Pergamino",
    "Fotográfico",
];

pub const SAMPLE_COLUMNS: [&str; 11] = [
    "id_trabajo",
    "fecha_solicitud",
    "departamento",
    "tipo_trabajo",
    "cantidad_paginas",
    "cantidad_copias",
    "prioridad",
    "estado",
    "tiempo_produccion_horas",
    "costo_estimado",
    "material_utilizado",
];

const MEAN_PRODUCTION_HOURS: f64 = 10.0;

/// Builds `size` jobs requested one hour apart starting 2023-01-01.
/// The same seed always yields the same table.
pub fn generate_sample(size: usize, seed: u64) -> Result<Table> {
    let mut rng = StdRng::seed_from_u64(seed);
    let priorities = WeightedIndex::new(PRIORITY_WEIGHTS)
        .map_err(|e| EtlError::processing(format!("Invalid priority weights: {}", e)))?;
    let production_hours = Exp::new(1.0 / MEAN_PRODUCTION_HOURS)
        .map_err(|e| EtlError::processing(format!("Invalid production time rate: {}", e)))?;
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    let mut table = Table::new(SAMPLE_COLUMNS.iter().map(|c| c.to_string()).collect());

    for i in 0..size {
        let requested_at = start + Duration::hours(i as i64);
        let hours: f64 = production_hours.sample(&mut rng);
        let cost: f64 = rng.gen_range(50.0..5000.0);

        let mut record = Record::default();
        record.set("id_trabajo", Value::String(format!("TRB-{:05}", i + 1)));
        record.set(
            "fecha_solicitud",
            Value::String(requested_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        record.set("departamento", pick(&mut rng, &DEPARTMENTS));
        record.set("tipo_trabajo", pick(&mut rng, &JOB_TYPES));
        record.set("cantidad_paginas", Value::from(rng.gen_range(1i64..500)));
        record.set("cantidad_copias", Value::from(rng.gen_range(1i64..200)));
        record.set(
            "prioridad",
            Value::String(PRIORITIES[priorities.sample(&mut rng)].to_string()),
        );
        record.set("estado", pick(&mut rng, &STATES));
        record.set("tiempo_produccion_horas", Value::from(round2(hours)));
        // truncate so the upper bound stays exclusive
        record.set("costo_estimado", Value::from(floor2(cost)));
        record.set("material_utilizado", pick(&mut rng, &MATERIALS));

        table.records.push(record);
    }

    Ok(table)
}

fn pick(rng: &mut StdRng, options: &[&str]) -> Value {
    options
        .choose(rng)
        .map(|option| Value::String(option.to_string()))
        .unwrap_or(Value::Null)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn floor2(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}
