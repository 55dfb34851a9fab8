mod common;
mod hackathons;
