use sovran_mapper::{try_from_fn, Mapper, MappingError};
use std::collections::VecDeque;
use std::num::ParseIntError;

// Example domain: raw readings parsed into numbers
struct RawReading {
    text: String,
}

#[derive(Debug)]
struct Reading {
    value: i64,
    doubled: i64,
}

fn parse(raw: &RawReading) -> Result<Reading, ParseIntError> {
    let value = raw.text.trim().parse::<i64>()?;
    Ok(Reading {
        value,
        doubled: value * 2,
    })
}

fn raw(texts: &[&str]) -> Vec<RawReading> {
    texts
        .iter()
        .map(|t| RawReading {
            text: t.to_string(),
        })
        .collect()
}

fn main() -> Result<(), ParseIntError> {
    let mapper = Mapper::new(try_from_fn(parse));

    // Fixed array, allocated once at the source length
    let readings = mapper.map_array(&raw(&["1", " 2", "42"]))?;
    for reading in readings.iter() {
        println!("value {} doubled {}", reading.value, reading.doubled);
    }

    // Any growable collection
    let queue: VecDeque<Reading> = mapper.map_into_new(&raw(&["7", "8"]))?;
    println!("queued {} readings, front = {:?}", queue.len(), queue.front());

    // Appending into a collection we already own
    let mut history = readings.into_vec();
    mapper.map_into_existing(&raw(&["100"]), &mut history)?;
    println!("history now has {} readings", history.len());

    // A bad element fails the whole call and leaves history untouched
    match mapper.map_into_existing(&raw(&["5", "five"]), &mut history) {
        Ok(_) => println!("This shouldn't happen - 'five' is not a number"),
        Err(e) => println!("Rejected batch: {} (history still {})", e, history.len()),
    }

    // Optional input goes through the checked view
    let missing: Option<&Vec<RawReading>> = None;
    match mapper.checked().map_array(missing) {
        Err(MappingError::NullArgument { parameter }) => {
            println!("Correctly detected missing `{}`", parameter)
        }
        other => println!("Unexpected result: {:?}", other.map(|r| r.len())),
    }

    Ok(())
}
