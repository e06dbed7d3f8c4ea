use serde_json::json;

use crate::db::connection;
use crate::output;

pub fn run(json_output: bool) -> i32 {
    super::finish(
        (|| {
            let path = connection::init_db()?;
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success(json!({
                        "path": path.display().to_string()
                    })))
                    .unwrap()
                );
            } else {
                println!("Initialized taskplan workspace at {}", path.display());
            }
            Ok(0)
        })(),
        json_output,
    )
}
