use sovran_mapper::{
    CollectionChange, Mapper, MapperRegistry, ObservableCollection, RegistryError, TypeMapper,
};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::thread;

// Storage model
#[derive(Debug, Clone)]
struct ContactRecord {
    id: u64,
    first: String,
    last: String,
    email: Option<String>,
}

// Presentation model, bound to a list that wants change notifications
#[derive(Debug, Clone, PartialEq)]
struct ContactRow {
    id: u64,
    display_name: String,
    reachable: bool,
}

struct RecordToRow;

impl TypeMapper<ContactRecord, ContactRow> for RecordToRow {
    type Error = Infallible;

    fn map(&self, record: &ContactRecord) -> Result<ContactRow, Infallible> {
        Ok(ContactRow {
            id: record.id,
            display_name: format!("{}, {}", record.last, record.first),
            reachable: record.email.is_some(),
        })
    }
}

fn records() -> Vec<ContactRecord> {
    vec![
        ContactRecord {
            id: 1,
            first: "Ada".into(),
            last: "Lovelace".into(),
            email: Some("ada@example.com".into()),
        },
        ContactRecord {
            id: 2,
            first: "Alan".into(),
            last: "Turing".into(),
            email: None,
        },
    ]
}

fn main() -> Result<(), RegistryError> {
    // Register once at startup
    let registry = MapperRegistry::new();
    registry.register::<ContactRecord, ContactRow, _>(RecordToRow)?;

    // A view model holding an observable list
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let mut rows = ObservableCollection::new();
    rows.subscribe(move |change: &CollectionChange<'_, ContactRow>| {
        let line = match change {
            CollectionChange::Added { index, item } => {
                format!("+ [{}] {}", index, item.display_name)
            }
            CollectionChange::Removed { index, item } => {
                format!("- [{}] {}", index, item.display_name)
            }
            CollectionChange::Replaced { index, new, .. } => {
                format!("~ [{}] {}", index, new.display_name)
            }
            CollectionChange::Cleared => "cleared".to_string(),
        };
        sink.lock().unwrap().push(line);
    });

    let mapper: Mapper<_> = registry.resolve::<ContactRecord, ContactRow, Infallible>()?;
    mapper.map_into_existing(&records(), &mut rows).unwrap();
    rows.remove(1);

    for line in log.lock().unwrap().iter() {
        println!("{}", line);
    }

    // Other threads resolve the same rule
    let worker = {
        let registry = registry.clone();
        thread::spawn(move || -> Result<usize, RegistryError> {
            let mapper = registry.resolve::<ContactRecord, ContactRow, Infallible>()?;
            let fresh = mapper.map_into_observable(&records()).unwrap();
            Ok(fresh.iter().filter(|row| row.reachable).count())
        })
    };
    match worker.join() {
        Ok(result) => println!("Reachable contacts: {}", result?),
        Err(_) => println!("Worker thread panicked"),
    }

    // Asking for a pair nobody registered
    match registry.resolve::<ContactRow, ContactRecord, Infallible>() {
        Ok(_) => println!("This shouldn't happen"),
        Err(e) => println!("Expected error: {}", e),
    }

    Ok(())
}
