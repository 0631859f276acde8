use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Sender},
    thread,
};

use anyhow::Context;
use atc_recognition_rs::{CommandPipeline, Gazetteer, RuleTables, WriterSink};
use aviation_helper_rs::clearance::airlines::Airlines;
use clap::Parser;

mod config;
mod session;

use config::Args;
use session::Session;

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let gazetteer = Gazetteer::load_or_empty(&args.fixes, args.airport_scope());
    if args.list_airports {
        for airport in gazetteer.airports() {
            println!("{airport}");
        }
        return Ok(());
    }

    let pipeline = build_pipeline(&args, gazetteer)?;
    let (tx, rx) = mpsc::channel::<String>();
    let stdin_reader = if args.inputs.is_empty() {
        log::info!("Reading transcripts from stdin");
        Some(thread::spawn(move || read_stdin(tx)))
    } else {
        for transcript in transcribe_inputs(&args)? {
            tx.send(transcript)?;
        }
        drop(tx);
        None
    };

    let mut session = Session::new(
        pipeline,
        WriterSink::new(io::stdout().lock()),
        args.history,
    );
    let delivered = session.run(rx)?;
    log::info!("Delivered {delivered} commands");

    if let Some(handle) = stdin_reader {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("stdin reader panicked"))??;
    }
    Ok(())
}

fn build_pipeline(args: &Args, gazetteer: Gazetteer) -> anyhow::Result<CommandPipeline> {
    let mut builder = CommandPipeline::builder().gazetteer(gazetteer);
    if let Some(path) = &args.rules {
        let rules = RuleTables::load_from_file(path)
            .with_context(|| format!("Failed to load rule tables from {path:?}"))?;
        builder = builder.rules(rules);
    }
    if let Some(path) = &args.airlines {
        match Airlines::load_airlines_from_path(path) {
            Ok(airlines) => {
                let designators = airlines.designators();
                log::info!(
                    "Loaded {} airline callsigns from {path:?}",
                    designators.len()
                );
                builder = builder.designators(designators);
            }
            Err(err) => log::warn!("Could not load airline database {path:?}: {err}"),
        }
    }
    Ok(builder.build()?)
}

/// One transcript per line until EOF or until the session stops listening.
fn read_stdin(tx: Sender<String>) -> io::Result<()> {
    for line in io::stdin().lock().lines() {
        if tx.send(line?).is_err() {
            break;
        }
    }
    Ok(())
}

#[cfg(feature = "whisper")]
fn transcribe_inputs(args: &Args) -> anyhow::Result<Vec<String>> {
    use atc_recognition_rs::{
        Transcriber,
        speech_to_text::{SpeechToText, SpeechToTextConfig, read_wav_file},
    };

    let Some(model) = &args.model else {
        return Ok(args.inputs.clone());
    };
    let speech_to_text = SpeechToText::new(SpeechToTextConfig::new(model))?;
    args.inputs
        .iter()
        .map(|input| -> anyhow::Result<String> {
            if !input.to_lowercase().ends_with(".wav") {
                return Ok(input.clone());
            }
            let samples =
                read_wav_file(input).with_context(|| format!("Failed to read {input}"))?;
            let transcript = speech_to_text.transcribe(&samples)?;
            log::info!("{input}: {transcript:?}");
            Ok(transcript)
        })
        .collect()
}

#[cfg(not(feature = "whisper"))]
fn transcribe_inputs(args: &Args) -> anyhow::Result<Vec<String>> {
    Ok(args.inputs.clone())
}
