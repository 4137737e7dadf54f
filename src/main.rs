use clap::Parser;
use imprenta_etl::core::ConfigProvider;
use imprenta_etl::utils::{logger, validation::Validate};
use imprenta_etl::{CliConfig, EtlEngine, LocalStorage, ProductionPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting imprenta-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    println!("{}", "=".repeat(60));
    println!("SISTEMA ETL - TALLER DE IMPRENTA");
    println!("{}", "=".repeat(60));

    let storage = LocalStorage::new(config.data_path());
    let pipeline = ProductionPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            println!();
            println!("📊 RESUMEN DEL PROCESAMIENTO:");
            for line in outcome.summary.report_lines() {
                println!("{}", line);
            }
            println!("• Archivo generado: {}", outcome.output_path);
            if !outcome.phases.is_empty() {
                println!();
                println!("⏱️ RECURSOS POR FASE:");
                for stats in &outcome.phases {
                    println!("{}", stats.report_line());
                }
            }
            println!();
            println!("✅ Proceso completado exitosamente");
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
