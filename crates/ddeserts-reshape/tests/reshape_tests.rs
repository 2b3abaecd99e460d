//! Reshaping census CSV rows into per-geography records

mod common;

use common::{cvap_row, row, total_and_black_config};
use ddeserts_core::{CensusConfig, Population, Race, Stat};
use ddeserts_reshape::{
    read_rows, CsvOptions, FelonyConverter, Reshaper, DISENFRANCHISED_COLUMN, PRISON_COLUMN,
    VEP_COLUMN,
};

#[test]
fn test_two_geographies_merge_by_prefix() {
    let config = total_and_black_config();
    let rows = vec![
        cvap_row("A", "Total", "100"),
        cvap_row("A", "Black Alone", "20"),
        cvap_row("B", "Total", "50"),
    ];

    let records = Reshaper::new(&config).reshape(rows).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].geo_id, "A");
    assert_eq!(records[0].value("tot_est"), Some(100.0));
    assert_eq!(records[0].value("blk_tot_est"), Some(20.0));
    assert_eq!(records[0].len(), 2);

    assert_eq!(records[1].geo_id, "B");
    assert_eq!(records[1].value("tot_est"), Some(50.0));
    assert_eq!(records[1].value("blk_tot_est"), None);
}

#[test]
fn test_repeated_breakdown_last_wins() {
    let config = total_and_black_config();
    let rows = vec![
        cvap_row("A", "Total", "100"),
        cvap_row("A", "Total", "120"),
    ];
    let records = Reshaper::new(&config).reshape(rows).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value("tot_est"), Some(120.0));
}

#[test]
fn test_non_contiguous_geography_gives_two_records() {
    let config = total_and_black_config();
    let rows = vec![
        cvap_row("A", "Total", "100"),
        cvap_row("B", "Total", "50"),
        cvap_row("A", "Black Alone", "20"),
    ];
    let records = Reshaper::new(&config).reshape(rows).unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.geo_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "A"]);
    assert_eq!(records[2].value("tot_est"), None);
    assert_eq!(records[2].value("blk_tot_est"), Some(20.0));
}

#[test]
fn test_empty_input() {
    let config = CensusConfig::default();
    let records = Reshaper::new(&config).reshape(Vec::new()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_missing_breakdown_field_is_structural() {
    let config = CensusConfig::default();
    let rows = vec![row(&[("geoid", "A"), ("geoname", "Oregon"), ("tot_est", "1")])];
    assert!(Reshaper::new(&config).reshape(rows).is_err());
}

#[test]
fn test_csv_to_table() -> anyhow::Result<()> {
    let csv = "\
geoname,lntitle,geoid,lnnumber,tot_est,tot_moe,adu_est,adu_moe
\"Alameda County, California\",Total,05000US06001,1,1000,*****,800,20
\"Alameda County, California\",Asian Alone,05000US06001,4,300,25,240,18
\"Alameda County, California\",Not Hispanic or Latino,05000US06001,2,900,10,700,10
\"Butte County, California\",Total,05000US06007,1,200,*****,150,8
";
    let config = CensusConfig::default();
    let rows = read_rows(csv.as_bytes(), &CsvOptions::new())?;
    let table = Reshaper::new(&config).reshape_table(rows)?;

    assert_eq!(table.len(), 2);
    let asn = Race::new("asn")?;
    let alameda = &table.records()[0];
    assert_eq!(alameda.geography.name, "Alameda");
    assert_eq!(alameda.estimate(&Stat::total(Population::Tot)).moe, 0.0);
    assert_eq!(alameda.estimate(&Stat::count(&asn, Population::Adu)).est, 240.0);

    // Butte has no Asian rows; the column exists table-wide but reads as NaN there
    assert!(table.has_stat(&Stat::count(&asn, Population::Adu)));
    let butte = &table.records()[1];
    assert!(butte.estimate(&Stat::count(&asn, Population::Adu)).is_nan());
    Ok(())
}

#[test]
fn test_felony_csv_with_wrapped_headers() -> anyhow::Result<()> {
    let csv = "STATE,\"VOTING\r\nELIGIBLE POPULATION\",PRISON,PROBATION,TOTAL,% DISF.\r\n\
               Alabama,\"3,706,000\",\"25,000\",,\"328,198\",8.94\r\n\
               Maine,\"1,100,000\",,,0,0\r\n";
    let rows = read_rows(csv.as_bytes(), &CsvOptions::new())?;
    let records = FelonyConverter::new().convert_all(rows)?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].geoname, "Alabama");
    assert_eq!(records[0].value(VEP_COLUMN), Some(3_706_000.0));
    assert_eq!(records[0].value(PRISON_COLUMN), Some(25_000.0));
    assert_eq!(records[0].value(DISENFRANCHISED_COLUMN), Some(328_198.0));

    assert_eq!(records[1].geoname, "Maine");
    assert_eq!(records[1].value(PRISON_COLUMN), Some(0.0));
    assert_eq!(records[1].value(DISENFRANCHISED_COLUMN), Some(0.0));
    Ok(())
}
