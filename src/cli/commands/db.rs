use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit::audit_all;
use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            run_pending_migrations(&mut pool.conn)?;
            for v in applied_versions(&pool.conn)? {
                println!("   • {}", v);
            }
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        //
        // 2) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
            }

            println!("{}▶ Auditing attendance history…{}", CYAN, RESET);
            let (users, failures) = audit_all(&pool.conn)?;
            for f in &failures {
                println!("{}✘{} {}", RED, RESET, f);
            }

            if integrity != "ok" || !failures.is_empty() {
                return Err(AppError::Other(format!(
                    "database check failed ({} of {} users with a broken history)",
                    failures.len(),
                    users
                )));
            }
            println!("{}✔ {} users audited, histories alternate correctly.{}\n", GREEN, users, RESET);
        }

        //
        // 3) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
