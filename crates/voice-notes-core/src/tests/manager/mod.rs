mod persistence;
mod recording;
mod removal;
