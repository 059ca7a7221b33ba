#![no_main]
use libfuzzer_sys::fuzz_target;

use dsv::ReaderBuilder;

fuzz_target!(|data: &[u8]| {
    let mut rdr = match ReaderBuilder::new().utf8_lossy(true).from_reader(data)
    {
        Ok(rdr) => rdr,
        Err(_) => return,
    };
    let table = match rdr.read_table() {
        Ok(table) => table,
        Err(_) => return,
    };

    let mut wtr = dsv::Writer::from_writer(vec![]);
    wtr.write_table(&table).unwrap();
    let out = wtr.into_inner().unwrap();
    let again = dsv::Reader::from_reader(&out[..]).read_table().unwrap();
    assert_eq!(table, again);
});
