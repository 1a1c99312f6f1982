use saros_felt::Felt;

use crate::*;

#[test]
fn sn_main_matches_short_string_encoding() {
    assert_eq!(SN_MAIN_CHAIN_ID, chain_id_from_name("SN_MAIN").unwrap());
    assert_eq!(SN_MAIN_CHAIN_ID, Felt::from_hex_be("0x534e5f4d41494e").unwrap());
}

#[test]
fn sn_goerli_matches_short_string_encoding() {
    assert_eq!(SN_GOERLI_CHAIN_ID, chain_id_from_name("SN_GOERLI").unwrap());
    assert_eq!(SN_GOERLI_CHAIN_ID, Felt::from_hex_be("0x534e5f474f45524c49").unwrap());
}

#[test]
fn custom_names_round_trip() {
    let chain_id = chain_id_from_name("SN_SEPOLIA").unwrap();
    assert_eq!(chain_id.to_short_string().unwrap(), "SN_SEPOLIA");
}
