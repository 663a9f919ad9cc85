#![allow(dead_code)]
use alloy::sol;

sol!(
    #[sol(rpc)]
    contract UpgradeableProxy {
        function implementation() external view returns (address);

        // Implementation functions reached through the fallback.
        function initialize(string name, uint256 value) external;
        function name() external view returns (string);
        function value() external view returns (uint256);
        function setValue(uint256 value) external;
        function owner() external view returns (address);

        #[derive(Debug, PartialEq)]
        event Upgraded(address indexed implementation);
    }
);
