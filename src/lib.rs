pub mod bimap;
pub mod cardinality;
pub mod mapping;
pub mod mapping_type;
pub mod pprint;
