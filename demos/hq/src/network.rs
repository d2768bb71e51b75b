//! Default ten-city network and ten-rider roster.

use std::io::Cursor;

use pd_agent::{AgentPool, AgentResult, load_roster_reader};
use pd_spatial::{RouteGraph, SpatialResult};

/// `(name, zone)`; Lahore is the hub.
const CITIES: [(&str, &str); 10] = [
    ("Lahore", "Zone A"),
    ("Islamabad", "Zone B"),
    ("Karachi", "Zone C"),
    ("Peshawar", "Zone B"),
    ("Multan", "Zone A"),
    ("Faisalabad", "Zone A"),
    ("Quetta", "Zone D"),
    ("Hafizabad", "Zone A"),
    ("Rawalpindi", "Zone B"),
    ("Sukkur", "Zone C"),
];

/// Two-way roads in km.
const ROADS: [(&str, &str, u32); 12] = [
    ("Lahore", "Islamabad", 375),
    ("Lahore", "Faisalabad", 180),
    ("Lahore", "Multan", 345),
    ("Lahore", "Hafizabad", 105),
    ("Islamabad", "Peshawar", 155),
    ("Islamabad", "Rawalpindi", 20),
    ("Faisalabad", "Hafizabad", 90),
    ("Faisalabad", "Multan", 240),
    ("Multan", "Sukkur", 490),
    ("Sukkur", "Karachi", 470),
    ("Sukkur", "Quetta", 390),
    ("Quetta", "Karachi", 690),
];

// Every rider carries one parcel at a time.
const ROSTER_CSV: &str = "\
name,capacity,tier\n\
Ali Khan,1,standard\n\
Bilal Ahmed,1,standard\n\
Asad Malik,1,express\n\
Usman Tariq,1,express\n\
Fahad Mustafa,1,standard\n\
Ahmed Raza,1,standard\n\
Imran Haider,1,express\n\
Zain Sheikh,1,express\n\
Hamza Ali,1,standard\n\
Hassan Bib,1,standard\n\
";

pub fn default_network() -> SpatialResult<RouteGraph> {
    let mut graph = RouteGraph::new();
    for (name, zone) in CITIES {
        graph.add_city(name, zone)?;
    }
    for (u, v, km) in ROADS {
        graph.add_road_by_name(u, v, km)?;
    }
    Ok(graph)
}

pub fn default_roster() -> AgentResult<AgentPool> {
    load_roster_reader(Cursor::new(ROSTER_CSV))
}
