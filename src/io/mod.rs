// Purpose - external interfaces: persistent sample output

pub mod writer;
