use anyhow::{Context, Result};
use sqlok::{DatabaseLoader, PostgresLoader, Table};

/// 连接数据库并打印所有表及字段
pub async fn run(url: &str, json: bool) -> Result<()> {
    let mut loader = PostgresLoader::connect(url)
        .await
        .context("Failed to connect to database")?;
    let loaded = loader.load().await.context("Failed to load database schema");
    loader.disconnect().await;
    loaded?;

    let tables = loader.tables();
    if json {
        let out = serde_json::to_string_pretty(tables).context("Failed to serialize schema")?;
        println!("{}", out);
    } else {
        print!("{}", render(tables));
    }
    Ok(())
}

fn render(tables: &[Table]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&table.qualified_name());
        out.push('\n');
        for field in &table.fields {
            out.push_str(&format!("    {} {}", field.name, field.data_type));
            if !field.nullable {
                out.push_str(" NOT NULL");
            }
            out.push('\n');
        }
    }
    out
}
