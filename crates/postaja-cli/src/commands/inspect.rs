use postaja_autopilot::allocate as allocate_slots;

use super::HorizonArgs;

pub fn slots(args: &HorizonArgs, format: &str) -> anyhow::Result<()> {
    let config = args.load_config()?;
    let slots = args.slots(&config);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&slots)?),
        _ => {
            if slots.is_empty() {
                println!("No slots: the schedule has no days or no times.");
            }
            for slot in &slots {
                println!("{slot}");
            }
        }
    }
    Ok(())
}

pub fn allocate(args: &HorizonArgs, slots: Option<u32>, format: &str) -> anyhow::Result<()> {
    let config = args.load_config()?;
    let total = match slots {
        Some(n) => n,
        None => args.slots(&config).len() as u32,
    };
    let allocation = allocate_slots(&config.objectives, total)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&allocation)?),
        _ => {
            println!("{total} slot(s)");
            for (objective, target) in &allocation.targets {
                println!(
                    "  {:<14} {:>3}  ({:.1}%)",
                    objective.as_str(),
                    target,
                    allocation.percentages.get(objective).copied().unwrap_or(0.0)
                );
            }
        }
    }
    Ok(())
}
