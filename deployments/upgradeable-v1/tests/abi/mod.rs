#![allow(dead_code)]
use alloy::sol;

sol!(
    #[sol(rpc)]
    contract UpgradeableV1 {
        function initialize(string name, uint256 value) external;
        function name() external view returns (string);
        function value() external view returns (uint256);
        function setName(string name) external;
        function setValue(uint256 value) external;
        function getInitializedVersion() external view returns (uint64);

        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
        function renounceOwnership() external;

        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes data) external payable;
        function proxiableUUID() external view returns (bytes32);

        #[derive(Debug, PartialEq)]
        event Initialized(uint64 version);
        #[derive(Debug, PartialEq)]
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
        #[derive(Debug, PartialEq)]
        event Upgraded(address indexed implementation);
    }
);
