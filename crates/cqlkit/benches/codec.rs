//! Codec benchmarks using divan

use cqlkit::{CodecRegistry, CqlValue, DataType, TypeCodec};

fn main() {
    divan::main();
}

fn int_list(len: i32) -> (DataType, CqlValue) {
    (
        DataType::list(DataType::int()),
        CqlValue::List((0..len).map(CqlValue::Int).collect()),
    )
}

mod wire {
    use super::{CodecRegistry, CqlValue, DataType, TypeCodec, int_list};

    #[divan::bench]
    fn bigint_builtin(bencher: divan::Bencher) {
        let codec = CodecRegistry::new().codec_for::<i64>(&DataType::bigint()).unwrap();
        bencher.bench_local(|| codec.serialize(divan::black_box(&42)));
    }

    #[divan::bench(args = [16, 1024])]
    fn serialize_list(bencher: divan::Bencher, len: i32) {
        let (data_type, value) = int_list(len);
        let codec = CodecRegistry::new().value_codec(&data_type);
        bencher.bench_local(|| codec.serialize(divan::black_box(&value)));
    }

    #[divan::bench(args = [16, 1024])]
    fn deserialize_list(bencher: divan::Bencher, len: i32) {
        let (data_type, value) = int_list(len);
        let codec = CodecRegistry::new().value_codec(&data_type);
        let bytes = codec.serialize(&value).unwrap();
        bencher.bench_local(|| codec.deserialize(divan::black_box(Some(bytes.as_slice()))));
    }

    #[divan::bench]
    fn tuple(bencher: divan::Bencher) {
        let data_type = DataType::tuple(vec![DataType::text(), DataType::double()]);
        let codec = CodecRegistry::new().value_codec(&data_type);
        let value = CqlValue::Tuple(vec![Some(CqlValue::text("x")), Some(CqlValue::Double(1.5))]);
        bencher.bench_local(|| codec.serialize(divan::black_box(&value)));
    }
}

mod literal {
    use super::{CodecRegistry, DataType, TypeCodec, int_list};

    #[divan::bench(args = [16, 1024])]
    fn parse_list(bencher: divan::Bencher, len: i32) {
        let (data_type, value) = int_list(len);
        let codec = CodecRegistry::new().value_codec(&data_type);
        let literal = codec.format(Some(&value)).unwrap();
        bencher.bench_local(|| codec.parse(divan::black_box(&literal)));
    }

    #[divan::bench]
    fn parse_map(bencher: divan::Bencher) {
        let data_type = DataType::map(DataType::text(), DataType::frozen_set(DataType::int()));
        let codec = CodecRegistry::new().value_codec(&data_type);
        bencher.bench_local(|| codec.parse(divan::black_box("{'a': {1, 2}, 'b': {3}}")));
    }
}
