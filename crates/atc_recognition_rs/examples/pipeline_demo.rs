use atc_recognition_rs::{AirportScope, CommandPipeline, Gazetteer, Issue};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gazetteer = Gazetteer::load(
        concat!(env!("CARGO_MANIFEST_DIR"), "/resources/fixes/fixes.json"),
        AirportScope::Airport("KDCA".to_owned()),
    )?;
    let pipeline = CommandPipeline::builder().gazetteer(gazetteer).build()?;

    let transmissions = [
        "SkyWest four five two, descend and maintain five thousand",
        "Delta one two three turn left heading two seven zero",
        "American four five six cleared ILS runway two eight left",
        "November one two three alpha bravo maintain eight thousand",
        "JetBlue five five clair direct jankee",
        "Delta one two three cleared direct zebra, climb and maintain one five thousand",
        "United one two expect mount vernon visual runway one",
        "Delta one two three disregard",
    ];

    println!("Interpreting example transmissions:\n");

    for transmission in transmissions {
        println!("Input: \"{transmission}\"");
        println!("  Normalized: \"{}\"", pipeline.normalize(transmission));
        match pipeline.interpret(transmission) {
            Ok(found) => {
                println!("  ✓ {}", found.command);
                for issue in &found.issues {
                    match issue {
                        Issue::UnresolvedFix { phrase, suggestions } => {
                            println!("    Unknown fix {phrase:?}, closest: {suggestions:?}")
                        }
                        Issue::InvalidNumericRange { entity, reason } => {
                            println!("    Dropped {entity}: {reason}")
                        }
                    }
                }
            }
            Err(rejection) => println!("  ✗ {rejection}"),
        }
        println!();
    }

    Ok(())
}
