//! Integration tests: field overrides, compute functions and profiles

use std::fmt;

use objmap::reflect::Complex;
use objmap::{
    configure_field_maps, BoxError, ConfigError, ErrorKind, FieldMapConfig, FieldMapProfile,
    MapError, Mapper, MapperConfig, Reflect,
};

#[derive(Reflect, Debug, Default, Clone, PartialEq)]
struct AllTypes {
    boolean: bool,
    int: isize,
    uint8: u8,
    float64: f64,
    complex64: Complex<f32>,
    pointer: Option<Box<isize>>,
    string: String,
}

#[derive(Reflect, Debug, Default, PartialEq)]
struct IntStruct {
    int_field: isize,
}

#[derive(Reflect, Debug, Default, PartialEq)]
struct WrappedAllTypes {
    all_types: AllTypes,
}

#[derive(Debug)]
struct TestError;

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Test Error")
    }
}

impl std::error::Error for TestError {}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("objmap=trace")
        .with_test_writer()
        .try_init();
}

fn source_with_int(int: isize) -> AllTypes {
    AllTypes {
        int,
        ..Default::default()
    }
}

#[test]
fn test_map_source_to_renamed_destination_field() -> anyhow::Result<()> {
    init_tracing();
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::rename("int_field", "int")])?;

    let mut destination = IntStruct::default();
    mapper.map(&source_with_int(1), &mut destination)?;
    assert_eq!(destination, IntStruct { int_field: 1 });
    Ok(())
}

#[test]
fn test_compute_takes_precedence_over_source() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::computed(
        "int_field",
        |_: &dyn Reflect| Ok::<_, BoxError>(2_isize),
    )
    .with_source("int")])?;

    let mut destination = IntStruct::default();
    mapper.map(&source_with_int(1), &mut destination)?;
    assert_eq!(destination, IntStruct { int_field: 2 });
    Ok(())
}

#[test]
fn test_compute_error_is_returned_unchanged() {
    let mut mapper = Mapper::new();
    mapper
        .configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::computed(
            "int_field",
            |_: &dyn Reflect| Err::<isize, _>(TestError),
        )
        .with_source("int")])
        .unwrap();

    let mut destination = IntStruct::default();
    let err = mapper.map(&source_with_int(1), &mut destination).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Custom);
    assert_eq!(err.to_string(), "Test Error");
    assert!(err.path().is_none());
    assert!(err.custom().unwrap().is::<TestError>());
    assert_eq!(destination, IntStruct::default());
}

#[test]
fn test_compute_error_leaves_later_fields_untouched() {
    #[derive(Reflect, Default)]
    struct Source {
        x: i32,
        y: i32,
    }
    #[derive(Reflect, Default)]
    struct Destination {
        x: i32,
        z: i32,
        y: i32,
    }

    let mut mapper = Mapper::new();
    mapper
        .configure_field_maps::<Source, Destination>([FieldMapConfig::computed(
            "z",
            |_: &dyn Reflect| Err::<i32, _>(TestError),
        )])
        .unwrap();

    let mut destination = Destination::default();
    let err = mapper
        .map(&Source { x: 1, y: 2 }, &mut destination)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Custom);
    assert_eq!(destination.x, 1);
    assert_eq!(destination.z, 0);
    assert_eq!(destination.y, 0);
}

#[test]
fn test_compute_on_same_type_copies_other_fields() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, AllTypes>([FieldMapConfig::computed(
        "int",
        |_: &dyn Reflect| Ok::<_, BoxError>(2_isize),
    )])?;

    let source = AllTypes {
        string: "kept".to_string(),
        ..source_with_int(1)
    };
    let destination: AllTypes = mapper.map_into(&source)?;
    assert_eq!(
        destination,
        AllTypes {
            int: 2,
            ..source.clone()
        }
    );
    Ok(())
}

#[test]
fn test_overrides_apply_to_nested_structs() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    configure_field_maps_on(&mut mapper)?;

    let source = WrappedAllTypes {
        all_types: source_with_int(1),
    };
    let mut destination = WrappedAllTypes::default();
    mapper.map(&source, &mut destination)?;
    assert_eq!(destination.all_types.int, 2);
    Ok(())
}

fn configure_field_maps_on(mapper: &mut Mapper) -> Result<(), ConfigError> {
    mapper.configure_field_maps::<AllTypes, AllTypes>([FieldMapConfig::computed(
        "int",
        |_: &dyn Reflect| Ok::<_, BoxError>(2_isize),
    )])
}

#[test]
fn test_overrides_are_scoped_to_their_type_pair() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::rename("int_field", "int")])?;

    // Reversed direction has no override, so nothing matches by name.
    let mut reversed = AllTypes::default();
    mapper.map(&IntStruct { int_field: 4 }, &mut reversed)?;
    assert_eq!(reversed.int, 0);
    Ok(())
}

#[test]
fn test_compute_reads_the_whole_source() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::computed(
        "int_field",
        |source: &dyn Reflect| {
            let all = source
                .downcast_ref::<AllTypes>()
                .ok_or("unexpected source type")?;
            Ok::<_, BoxError>(all.int + isize::from(all.uint8))
        },
    )])?;

    let source = AllTypes {
        uint8: 5,
        ..source_with_int(10)
    };
    let destination: IntStruct = mapper.map_into(&source)?;
    assert_eq!(destination.int_field, 15);
    Ok(())
}

#[test]
fn test_compute_with_wrong_result_type_is_a_mismatch() {
    let mut mapper = Mapper::new();
    mapper
        .configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::computed(
            "int_field",
            |_: &dyn Reflect| Ok::<_, BoxError>(2_i64),
        )])
        .unwrap();

    let err = mapper
        .map(&source_with_int(1), &mut IntStruct::default())
        .unwrap_err();
    assert!(matches!(
        &err,
        MapError::TypeMismatch { path, expected, found }
            if path == "$.int_field" && expected == "isize" && found == "i64"
    ));
}

#[test]
fn test_rename_to_missing_source_field_is_skipped() -> anyhow::Result<()> {
    let mut mapper = Mapper::new();
    mapper.configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::rename(
        "int_field",
        "does_not_exist",
    )])?;

    let mut destination = IntStruct { int_field: 8 };
    mapper.map(&source_with_int(1), &mut destination)?;
    assert_eq!(destination.int_field, 8);
    Ok(())
}

#[test]
fn test_configure_rejects_non_struct_pairs() {
    let mut mapper = Mapper::new();
    let err = mapper
        .configure_field_maps::<Vec<isize>, IntStruct>([FieldMapConfig::rename("int_field", "int")])
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotStruct { .. }));
    assert!(mapper.config().is_empty());
}

#[test]
fn test_configure_rejects_empty_destination() {
    let mut mapper = Mapper::new();
    let err = mapper
        .configure_field_maps::<AllTypes, IntStruct>([FieldMapConfig::new("")])
        .unwrap_err();
    assert!(matches!(err, ConfigError::DestinationRequired { index: 0 }));
}

#[test]
fn test_mapper_built_from_prepared_config() -> anyhow::Result<()> {
    let mut config = MapperConfig::new();
    configure_field_maps::<AllTypes, IntStruct>(
        &mut config,
        [FieldMapConfig::rename("int_field", "int")],
    )?;

    let mapper = Mapper::with_config(config);
    let destination: IntStruct = mapper.map_into(&source_with_int(6))?;
    assert_eq!(destination.int_field, 6);
    Ok(())
}

#[test]
fn test_yaml_profile_with_named_compute() -> anyhow::Result<()> {
    init_tracing();
    let mut mapper = Mapper::new();
    mapper.register_compute("doubled_int", |source: &dyn Reflect| {
        let all = source.downcast_ref::<AllTypes>().ok_or("expected AllTypes")?;
        Ok::<_, BoxError>(all.int * 2)
    });
    mapper.configure_yaml::<AllTypes, AllTypes>(
        r"
fields:
  - destination: int
    compute: doubled_int
  - destination: string
    source: string
",
    )?;

    let source = AllTypes {
        string: "s".to_string(),
        ..source_with_int(21)
    };
    let destination: AllTypes = mapper.map_into(&source)?;
    assert_eq!(destination.int, 42);
    assert_eq!(destination.string, "s");
    Ok(())
}

#[test]
fn test_profile_with_unknown_compute_is_rejected() {
    let mut mapper = Mapper::new();
    let profile = FieldMapProfile::parse("fields:\n  - destination: int\n    compute: missing\n").unwrap();
    let err = mapper
        .configure_profile::<AllTypes, AllTypes>(&profile)
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownCompute { ref name } if name == "missing"));
    assert!(mapper.config().is_empty());
}

#[test]
fn test_invalid_yaml_profile_reports_location() {
    let mut mapper = Mapper::new();
    let err = mapper
        .configure_yaml::<AllTypes, IntStruct>("fields: [destination: {")
        .unwrap_err();
    match err {
        ConfigError::Profile(profile) => assert!(profile.line.is_some()),
        other => panic!("expected profile error, got {other:?}"),
    }
}
