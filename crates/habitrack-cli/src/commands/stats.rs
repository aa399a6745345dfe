use super::open_session;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session()?;
    let entries = session.statistics()?.entries();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
