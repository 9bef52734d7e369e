//! Class and interface identifiers used to activate and query ADSI objects.
//!
//! Values come from `activeds.inf` and the ADSI headers.

use windows::core::GUID;

/// LDAP provider object. Supports `IADsOpenDSObject`.
pub const CLSID_LDAP: GUID = GUID::from_u128(0x228d9a81_c302_11cf_9aa4_00aa004a5691);

pub const CLSID_LDAP_NAMESPACE: GUID = GUID::from_u128(0x228d9a82_c302_11cf_9aa4_00aa004a5691);

pub const CLSID_WINNT_NAMESPACE: GUID = GUID::from_u128(0x250e91a0_0367_11cf_abc4_02608c9e7553);

/// Active Directory Services router class.
pub const CLSID_ADS: GUID = GUID::from_u128(0x4753da60_5b71_11cf_b035_00aa006e0975);

pub const CLSID_ADS_DSO_OBJECT: GUID = GUID::from_u128(0x549365d0_ec26_11cf_8310_00aa00b505db);

/// The `ADs:` namespaces container. Its children are the installed providers.
pub const CLSID_ADS_NAMESPACES: GUID = GUID::from_u128(0x233664b0_0367_11cf_abc4_02608c9e7553);

pub const CLSID_AD_SYSTEM_INFO: GUID = GUID::from_u128(0x50b6327f_afd1_11d2_9cb9_0000f87a369e);

pub const CLSID_ADS_OLEDB: GUID = GUID::from_u128(0xe0fa581d_2188_11d2_a739_00c04fa377a1);

pub const IID_IADS: GUID = GUID::from_u128(0xfd8256d0_fd15_11ce_abc4_02608c9e7553);

pub const IID_IADS_OPEN_DS_OBJECT: GUID = GUID::from_u128(0xddf2891e_0f9c_11d0_8ad4_00c04fd8d503);

pub const IID_IADS_CONTAINER: GUID = GUID::from_u128(0x001677d0_fd16_11ce_abc4_02608c9e7553);

pub const IID_IADS_MEMBERS: GUID = GUID::from_u128(0x451a0030_72ec_11cf_b03b_00aa006e0975);

pub const IID_IADS_GROUP: GUID = GUID::from_u128(0x27636b00_410f_11cf_b1ff_02608c9e7553);

pub const IID_IENUM_VARIANT: GUID = GUID::from_u128(0x00020404_0000_0000_c000_000000000046);

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::Networking::ActiveDirectory::{
        IADs, IADsContainer, IADsGroup, IADsMembers, IADsOpenDSObject,
    };
    use windows::Win32::System::Ole::IEnumVARIANT;
    use windows_core::Interface;

    #[test]
    fn interface_ids_match_bindings() {
        assert_eq!(IID_IADS, IADs::IID);
        assert_eq!(IID_IADS_OPEN_DS_OBJECT, IADsOpenDSObject::IID);
        assert_eq!(IID_IADS_CONTAINER, IADsContainer::IID);
        assert_eq!(IID_IADS_MEMBERS, IADsMembers::IID);
        assert_eq!(IID_IADS_GROUP, IADsGroup::IID);
        assert_eq!(IID_IENUM_VARIANT, IEnumVARIANT::IID);
    }

    #[test]
    fn ldap_classes_differ_only_in_first_field() {
        assert_eq!(CLSID_LDAP.data1 + 1, CLSID_LDAP_NAMESPACE.data1);
        assert_eq!(CLSID_LDAP.data2, CLSID_LDAP_NAMESPACE.data2);
        assert_eq!(CLSID_LDAP.data4, CLSID_LDAP_NAMESPACE.data4);
    }

    #[test]
    fn layout_matches_registry_form() {
        // {4753DA60-5B71-11CF-B035-00AA006E0975}
        assert_eq!(CLSID_ADS.data1, 0x4753_DA60);
        assert_eq!(CLSID_ADS.data2, 0x5B71);
        assert_eq!(CLSID_ADS.data3, 0x11CF);
        assert_eq!(CLSID_ADS.data4, [0xB0, 0x35, 0x00, 0xAA, 0x00, 0x6E, 0x09, 0x75]);
    }
}
