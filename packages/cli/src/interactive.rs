//! Interactive mode: toggle offence categories and look up suburbs.

use crime_rate_analytics_models::SelectionState;
use crime_rate_crime_models::Offence;
use dialoguer::{Input, MultiSelect, Select};

use crate::report;
use crate::session::Session;

enum Action {
    ShowRankings,
    ChooseOffences,
    ToggleAll,
    Search,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ShowRankings,
        Self::ChooseOffences,
        Self::ToggleAll,
        Self::Search,
        Self::Quit,
    ];

    fn label(&self, selection: SelectionState) -> String {
        match self {
            Self::ShowRankings => "Show rankings".to_string(),
            Self::ChooseOffences => "Choose offence categories".to_string(),
            Self::ToggleAll => match selection {
                SelectionState::All => "Deselect all offences [all]".to_string(),
                SelectionState::Some => "Deselect all offences [some]".to_string(),
                SelectionState::None => "Select all offences [none]".to_string(),
            },
            Self::Search => "Look up a suburb".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", session.config.name);
    println!();
    print!("{}", report::rankings(session.engine.view()));

    loop {
        let selection = session.filter().selection();
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label(selection)).collect();

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ShowRankings => print!("{}", report::rankings(session.engine.view())),
            Action::ChooseOffences => choose_offences(session)?,
            Action::ToggleAll => {
                let view = session.toggle_all();
                print!("{}", report::rankings(view));
            }
            Action::Search => search(session)?,
            Action::Quit => return Ok(()),
        }
    }
}

fn choose_offences(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Offence::all().iter().map(AsRef::as_ref).collect();
    let defaults: Vec<bool> = Offence::all()
        .iter()
        .map(|o| session.filter().is_active(*o))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Offences counted towards the crime rate (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    let mut filter = session.filter().clone();
    for (i, offence) in Offence::all().iter().enumerate() {
        if chosen.contains(&i) != filter.is_active(*offence) {
            filter.toggle(*offence);
        }
    }

    if &filter != session.filter() {
        print!("{}", report::rankings(session.set_filter(filter)));
    }
    Ok(())
}

fn search(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let text: String = Input::new()
        .with_prompt("Suburb name")
        .interact_text()?;

    let min_length = session.config.search.min_length;
    if text.trim().chars().count() < min_length {
        println!("Type at least {min_length} characters.");
        return Ok(());
    }

    let matches = crime_rate_search::filter_localities(session.engine.localities(), text.trim());
    if matches.is_empty() {
        println!("No suburbs match {text:?}.");
        return Ok(());
    }

    let names: Vec<&str> = matches.iter().map(|l| l.name.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Pick a suburb")
        .items(&names)
        .default(0)
        .interact()?;

    match session.engine.details(names[idx]) {
        Some(details) => print!("{}", report::details(&details)),
        None => println!("No crime rate available for {}.", names[idx]),
    }
    Ok(())
}
